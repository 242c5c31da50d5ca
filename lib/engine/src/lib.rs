//! Hybrid retrieval and aggregation engine for job postings.
//!
//! Combines semantic distance with a lexical trigram signal into a single
//! combined score, aggregates fragment-level matches into document-level
//! results, and formats bounded evidence for each. Storage and embedding
//! live behind the [`CandidateSource`] and [`Embedder`] traits so the
//! engine stays independent of any concrete backend.

pub mod aggregate;
pub mod error;
pub mod retrieve;
pub mod score;
pub mod types;

pub use aggregate::aggregate;
pub use error::{Error, Result};
pub use retrieve::{CandidateSource, Embedder, RetrieveOptions, Retriever, MAX_QUERY_KEYWORDS};
pub use score::{combined_score, score_candidate};
pub use types::{
    Candidate, DocumentAggregate, DocumentId, DocumentMeta, Evidence, Explanation, RankedResult,
    Retrieval, ScoredFragment,
};
