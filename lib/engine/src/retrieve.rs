//! The retrieval orchestrator: entry point of the engine.
//!
//! One invocation embeds the query, pulls a bounded distance-ordered
//! candidate pool from the storage collaborator, scores and aggregates it,
//! and formats evidence. Invocations are stateless and independent; the
//! only shared state is the static text tables.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::debug;

use crate::aggregate::aggregate;
use crate::error::{Error, Result};
use crate::score::score_candidate;
use crate::types::{
    Candidate, DocumentAggregate, Evidence, Explanation, RankedResult, Retrieval,
};

/// Keywords extracted from a query, upper bound.
pub const MAX_QUERY_KEYWORDS: usize = 12;
/// Per-document explanation caps.
const MAX_EXPLAIN_KEYWORDS: usize = 10;
const MAX_EXPLAIN_TECH_TERMS: usize = 12;

/// Embedding collaborator: text to a fixed-length dense vector. Must be
/// deterministic for identical input within a model version.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Dimension of the vectors this embedder produces.
    fn dim(&self) -> usize;
}

/// Storage collaborator: the two similarity primitives the engine combines.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Up to `limit` fragments ordered by semantic distance ascending.
    /// When the lexical index is present, each candidate carries the
    /// trigram similarity of its text against `query_text`.
    async fn candidates(
        &self,
        query_vector: &[f32],
        query_text: &str,
        limit: usize,
    ) -> Result<Vec<Candidate>>;

    /// Capability probe, checked once per retrieval - lexical availability
    /// is a property of the store, not of individual fragments.
    fn lexical_available(&self) -> bool;
}

/// Tunables for one retrieval. All caps are defensive: a zero cap removes
/// everything rather than erroring, and a negative weight is clamped to 0.
#[derive(Debug, Clone)]
pub struct RetrieveOptions {
    /// Documents to return.
    pub k: usize,
    /// Evidence fragments per document.
    pub per_doc: usize,
    /// Candidate pool fan-out width (distinct from `k`).
    pub candidates: usize,
    /// Lexical signal weight; 0 means distance-only scoring.
    pub weight: f32,
    /// Evidence length budget, in characters.
    pub max_quote_len: usize,
    /// Wrap matched keywords in evidence text.
    pub highlight: bool,
    /// Attach per-document explanations.
    pub explain: bool,
    /// Budget for each collaborator call; on expiry the invocation fails
    /// fast instead of hanging.
    pub timeout: Duration,
}

impl Default for RetrieveOptions {
    fn default() -> Self {
        Self {
            k: 8,
            per_doc: 2,
            candidates: 250,
            weight: 0.25,
            max_quote_len: 800,
            highlight: true,
            explain: false,
            timeout: Duration::from_secs(10),
        }
    }
}

/// The Hybrid Retrieval & Aggregation Engine.
///
/// Holds handles to the two collaborators; everything else is computed per
/// query. Cheap to clone, safe to share across concurrent requests.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    source: Arc<dyn CandidateSource>,
}

impl Retriever {
    #[must_use]
    pub fn new(embedder: Arc<dyn Embedder>, source: Arc<dyn CandidateSource>) -> Self {
        Self { embedder, source }
    }

    /// Handle to the embedding collaborator (used by ingest surfaces that
    /// embed fragment text with the same model the engine queries with).
    #[must_use]
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }

    /// Run one retrieval: embed, fetch candidates, score, aggregate,
    /// format. All-or-nothing: a collaborator failure or timeout surfaces
    /// as an error with no partial results, while an empty candidate pool
    /// is a valid empty response.
    pub async fn retrieve(&self, query: &str, opts: &RetrieveOptions) -> Result<Retrieval> {
        let lexical_available = self.source.lexical_available();
        let weight_used = if lexical_available {
            opts.weight.max(0.0)
        } else {
            // Lexical index absent: force distance-only scoring and report
            // the downgrade through the response metadata.
            0.0
        };
        let hybrid_used = lexical_available && weight_used > 0.0;

        let query_vector = timeout(opts.timeout, self.embedder.embed(query))
            .await
            .map_err(|_| Error::Timeout {
                stage: "embedding",
                timeout: opts.timeout,
            })??;

        let candidates = timeout(
            opts.timeout,
            self.source.candidates(&query_vector, query, opts.candidates),
        )
        .await
        .map_err(|_| Error::Timeout {
            stage: "candidate fetch",
            timeout: opts.timeout,
        })??;

        debug!(
            candidates = candidates.len(),
            hybrid_used, weight_used, "scoring candidate pool"
        );

        let scored = candidates
            .into_iter()
            .map(|c| score_candidate(c, weight_used))
            .collect();
        let aggregates = aggregate(scored, opts.per_doc, opts.k);

        let keywords = jobscout_text::query_keywords(query, MAX_QUERY_KEYWORDS);
        let results = aggregates
            .into_iter()
            .map(|agg| {
                let why = if opts.explain {
                    Some(explain(&agg, &keywords))
                } else {
                    None
                };
                let evidence = agg
                    .fragments
                    .iter()
                    .enumerate()
                    .map(|(i, f)| Evidence {
                        fragment_no: f.fragment_no,
                        text: jobscout_text::format_evidence(
                            &f.text,
                            &keywords,
                            opts.max_quote_len,
                            opts.highlight,
                        ),
                        distance: f.distance,
                        lexical: f.lexical,
                        combined: f.combined,
                        rank: (i + 1) as u32,
                    })
                    .collect();
                RankedResult {
                    doc_id: agg.doc_id,
                    meta: agg.meta,
                    best_score: agg.best_score,
                    evidence,
                    why,
                }
            })
            .collect();

        Ok(Retrieval {
            results,
            hybrid_used,
            weight_used,
        })
    }
}

/// Which extracted keywords and technology terms literally occur in the
/// document's evidence (case-insensitive substring test over the raw,
/// unformatted fragment text).
fn explain(agg: &DocumentAggregate, keywords: &[String]) -> Explanation {
    let joined = agg
        .fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let query_matches = keywords
        .iter()
        .filter(|kw| joined.contains(kw.as_str()))
        .take(MAX_EXPLAIN_KEYWORDS)
        .cloned()
        .collect();
    let tech_terms = jobscout_text::tech_terms(&joined)
        .into_iter()
        .take(MAX_EXPLAIN_TECH_TERMS)
        .collect();

    Explanation {
        query_matches,
        tech_terms,
    }
}
