//! The in-memory posting store.
//!
//! Postings own their fragments; the candidate query is a parallel
//! brute-force distance scan over every embedded fragment, keeping the
//! closest `limit` with a bounded max-heap. All access goes through one
//! `RwLock`, so concurrent retrievals share the read path and ingest takes
//! the write path alone.

use std::collections::BinaryHeap;

use ahash::AHashMap;
use async_trait::async_trait;
use jobscout_engine::{
    Candidate, CandidateSource, DocumentId, DocumentMeta, Error, Result,
};
use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::vector::cosine_distance;

/// Store configuration, fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Expected embedding dimension; vectors of any other length are
    /// rejected at ingest.
    pub vector_dim: usize,
    /// Whether candidates carry the trigram lexical signal. Disabling it
    /// downgrades every retrieval to distance-only scoring.
    pub enable_trigram: bool,
}

impl StoreConfig {
    #[inline]
    #[must_use]
    pub fn new(vector_dim: usize) -> Self {
        Self {
            vector_dim,
            enable_trigram: true,
        }
    }

    #[must_use]
    pub fn without_trigram(mut self) -> Self {
        self.enable_trigram = false;
        self
    }
}

/// One stored fragment. The embedding is optional so a posting can be
/// ingested before its vectors are computed; unembedded fragments are
/// invisible to the candidate scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentRecord {
    pub doc_id: DocumentId,
    pub fragment_no: u32,
    pub text: String,
    pub embedding: Option<Vec<f32>>,
}

/// Fragment as supplied by an ingest caller.
#[derive(Debug, Clone)]
pub struct FragmentInput {
    pub text: String,
    pub embedding: Option<Vec<f32>>,
}

impl FragmentInput {
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            embedding: Some(embedding),
        }
    }
}

/// Corpus counters reported by the stats surface.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StoreCounts {
    pub postings: usize,
    pub fragments: usize,
    pub embedded: usize,
}

#[derive(Default)]
pub(crate) struct Inner {
    pub(crate) postings: AHashMap<DocumentId, DocumentMeta>,
    pub(crate) fragments: Vec<FragmentRecord>,
}

/// Thread-safe posting store backing the retrieval engine.
pub struct PostingStore {
    pub(crate) config: StoreConfig,
    pub(crate) inner: RwLock<Inner>,
}

impl PostingStore {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            inner: RwLock::new(Inner::default()),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Insert or replace a posting and all of its fragments.
    ///
    /// Replacement is whole-posting: previous fragments of this document
    /// are dropped first, so repeated ingest of the same posting never
    /// accumulates duplicates.
    pub fn upsert_posting(
        &self,
        doc_id: DocumentId,
        meta: DocumentMeta,
        fragments: Vec<FragmentInput>,
    ) -> Result<()> {
        for fragment in &fragments {
            if let Some(embedding) = &fragment.embedding {
                if embedding.len() != self.config.vector_dim {
                    return Err(Error::InvalidDimension {
                        expected: self.config.vector_dim,
                        actual: embedding.len(),
                    });
                }
            }
        }

        let mut inner = self.inner.write();
        inner.fragments.retain(|f| f.doc_id != doc_id);
        inner
            .fragments
            .extend(fragments.into_iter().enumerate().map(|(no, f)| {
                FragmentRecord {
                    doc_id,
                    fragment_no: no as u32,
                    text: f.text,
                    embedding: f.embedding,
                }
            }));
        inner.postings.insert(doc_id, meta);
        debug!(doc_id, "posting upserted");
        Ok(())
    }

    pub fn remove_posting(&self, doc_id: DocumentId) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.postings.remove(&doc_id).is_none() {
            return Err(Error::PostingNotFound(doc_id));
        }
        inner.fragments.retain(|f| f.doc_id != doc_id);
        Ok(())
    }

    /// Metadata and fragment texts of one posting, in fragment order.
    #[must_use]
    pub fn posting(&self, doc_id: DocumentId) -> Option<(DocumentMeta, Vec<String>)> {
        let inner = self.inner.read();
        let meta = inner.postings.get(&doc_id)?.clone();
        let mut texts: Vec<(u32, String)> = inner
            .fragments
            .iter()
            .filter(|f| f.doc_id == doc_id)
            .map(|f| (f.fragment_no, f.text.clone()))
            .collect();
        texts.sort_by_key(|(no, _)| *no);
        Some((meta, texts.into_iter().map(|(_, t)| t).collect()))
    }

    #[must_use]
    pub fn counts(&self) -> StoreCounts {
        let inner = self.inner.read();
        StoreCounts {
            postings: inner.postings.len(),
            fragments: inner.fragments.len(),
            embedded: inner
                .fragments
                .iter()
                .filter(|f| f.embedding.is_some())
                .count(),
        }
    }

    /// All fragment texts, for corpus-wide analytics scans.
    #[must_use]
    pub fn fragment_texts(&self) -> Vec<String> {
        self.inner
            .read()
            .fragments
            .iter()
            .map(|f| f.text.clone())
            .collect()
    }

    /// Metadata of every posting, for area/employer analytics.
    #[must_use]
    pub fn posting_metas(&self) -> Vec<DocumentMeta> {
        self.inner.read().postings.values().cloned().collect()
    }

    /// Every posting with its fragment texts joined into one document, for
    /// per-posting analytics.
    #[must_use]
    pub fn documents(&self) -> Vec<(DocumentId, String)> {
        let inner = self.inner.read();
        let mut joined: AHashMap<DocumentId, String> = inner
            .postings
            .keys()
            .map(|id| (*id, String::new()))
            .collect();
        for f in &inner.fragments {
            if let Some(text) = joined.get_mut(&f.doc_id) {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(&f.text);
            }
        }
        let mut docs: Vec<(DocumentId, String)> = joined.into_iter().collect();
        docs.sort_by_key(|(id, _)| *id);
        docs
    }

    fn scan(&self, query_vector: &[f32], query_text: &str, limit: usize) -> Vec<Candidate> {
        let inner = self.inner.read();

        let distances: Vec<(f32, usize)> = inner
            .fragments
            .par_iter()
            .enumerate()
            .filter_map(|(idx, f)| {
                f.embedding
                    .as_ref()
                    .map(|e| (cosine_distance(query_vector, e), idx))
            })
            .collect();

        // Bounded max-heap: pop the current worst once it overflows, so
        // only the `limit` smallest distances survive the scan.
        let mut heap: BinaryHeap<(OrderedFloat<f32>, usize)> =
            BinaryHeap::with_capacity(limit + 1);
        for (distance, idx) in distances {
            heap.push((OrderedFloat(distance), idx));
            if heap.len() > limit {
                heap.pop();
            }
        }

        heap.into_sorted_vec()
            .into_iter()
            .map(|(distance, idx)| {
                let f = &inner.fragments[idx];
                let meta = inner.postings.get(&f.doc_id).cloned().unwrap_or_default();
                let lexical = self
                    .config
                    .enable_trigram
                    .then(|| jobscout_text::trigram_similarity(query_text, &f.text));
                Candidate {
                    doc_id: f.doc_id,
                    meta,
                    fragment_no: f.fragment_no,
                    text: f.text.clone(),
                    distance: distance.into_inner(),
                    lexical,
                }
            })
            .collect()
    }
}

#[async_trait]
impl CandidateSource for PostingStore {
    async fn candidates(
        &self,
        query_vector: &[f32],
        query_text: &str,
        limit: usize,
    ) -> Result<Vec<Candidate>> {
        if query_vector.len() != self.config.vector_dim {
            return Err(Error::InvalidDimension {
                expected: self.config.vector_dim,
                actual: query_vector.len(),
            });
        }
        if limit == 0 {
            return Ok(Vec::new());
        }
        Ok(self.scan(query_vector, query_text, limit))
    }

    fn lexical_available(&self) -> bool {
        self.config.enable_trigram
    }
}
