//! JSON snapshot persistence for the posting store.
//!
//! The whole store serializes to a single JSON document written through an
//! atomic temp-file rename, so a crash mid-save never corrupts the
//! previous snapshot.

use std::io::Write;
use std::path::Path;

use atomicwrites::{AtomicFile, OverwriteBehavior};
use jobscout_engine::{DocumentId, DocumentMeta, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::store::{FragmentRecord, Inner, PostingStore, StoreConfig};

#[derive(Debug, Serialize, Deserialize)]
struct PostingEntry {
    doc_id: DocumentId,
    meta: DocumentMeta,
}

/// Serializable image of a complete store.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSnapshot {
    config: StoreConfig,
    postings: Vec<PostingEntry>,
    fragments: Vec<FragmentRecord>,
}

impl StoreSnapshot {
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes =
            serde_json::to_vec(self).map_err(|e| Error::Serialization(e.to_string()))?;
        let file = AtomicFile::new(path, OverwriteBehavior::AllowOverwrite);
        file.write(|f| f.write_all(&bytes))
            .map_err(|e| Error::Storage(e.to_string()))?;
        info!(
            path = %path.display(),
            postings = self.postings.len(),
            "snapshot saved"
        );
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| Error::Serialization(e.to_string()))
    }
}

impl PostingStore {
    /// Capture a point-in-time image of the store.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        let inner = self.inner.read();
        let mut postings: Vec<PostingEntry> = inner
            .postings
            .iter()
            .map(|(doc_id, meta)| PostingEntry {
                doc_id: *doc_id,
                meta: meta.clone(),
            })
            .collect();
        // Deterministic snapshot files regardless of map iteration order.
        postings.sort_by_key(|p| p.doc_id);
        StoreSnapshot {
            config: self.config.clone(),
            postings,
            fragments: inner.fragments.clone(),
        }
    }

    /// Rebuild a store from a snapshot, restoring its configuration.
    #[must_use]
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let store = PostingStore::new(snapshot.config);
        {
            let mut inner = store.inner.write();
            *inner = Inner {
                postings: snapshot
                    .postings
                    .into_iter()
                    .map(|p| (p.doc_id, p.meta))
                    .collect(),
                fragments: snapshot.fragments,
            };
        }
        store
    }
}
