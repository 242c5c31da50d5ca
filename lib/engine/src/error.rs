use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("embedding collaborator failed: {0}")]
    Embedding(String),

    #[error("storage collaborator failed: {0}")]
    Storage(String),

    #[error("{stage} call timed out after {timeout:?}")]
    Timeout {
        stage: &'static str,
        timeout: Duration,
    },

    #[error("invalid embedding dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("posting not found: {0}")]
    PostingNotFound(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// True when the failure came from a collaborator call (embedding or
    /// storage, including timeouts). Such failures are fatal for the
    /// invocation and never produce partial results.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            Error::Embedding(_) | Error::Storage(_) | Error::Timeout { .. }
        )
    }
}
