//! # jobscout
//!
//! Hybrid retrieval engine for job postings: dense vector distance plus a
//! character-trigram lexical signal, fragment-to-posting aggregation, and
//! bounded, highlighted evidence for every result.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install jobscout
//! jobscout --http-port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use jobscout::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> jobscout::Result<()> {
//! let store = Arc::new(PostingStore::new(StoreConfig::new(256)));
//! let embedder = Arc::new(HashEmbedder::new(256));
//!
//! let embedding = embedder.embed("Senior Python developer, Kafka").await?;
//! store.upsert_posting(
//!     1,
//!     DocumentMeta::new("Python Developer"),
//!     vec![FragmentInput::new("Senior Python developer, Kafka", embedding)],
//! )?;
//!
//! let retriever = Retriever::new(embedder, store);
//! let retrieval = retriever
//!     .retrieve("python developer", &RetrieveOptions::default())
//!     .await?;
//! for result in retrieval.results {
//!     println!("{} {:.3}", result.meta.name, result.best_score);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - [`jobscout-text`](https://docs.rs/jobscout-text) - tokenization, tech
//!   terms, trigram similarity, highlighting
//! - [`jobscout-engine`](https://docs.rs/jobscout-engine) - scoring,
//!   aggregation, the retrieval orchestrator
//! - [`jobscout-store`](https://docs.rs/jobscout-store) - posting store,
//!   embedders, snapshots
//! - [`jobscout-api`](https://docs.rs/jobscout-api) - the REST surface

// Re-export engine types
pub use jobscout_engine::{
    aggregate, combined_score, Candidate, CandidateSource, DocumentId, DocumentMeta, Embedder,
    Error, Evidence, Explanation, RankedResult, Result, Retrieval, RetrieveOptions, Retriever,
    ScoredFragment,
};

// Re-export storage
pub use jobscout_store::{
    FragmentInput, HashEmbedder, HttpEmbedder, PostingStore, StoreConfig, StoreSnapshot,
};

// Re-export API
pub use jobscout_api::{AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Candidate, CandidateSource, DocumentId, DocumentMeta, Embedder, Error, Evidence,
        FragmentInput, HashEmbedder, HttpEmbedder, PostingStore, RankedResult, Result, Retrieval,
        RetrieveOptions, Retriever, StoreConfig, StoreSnapshot,
    };
}

/// Text analysis primitives
pub mod text {
    pub use jobscout_text::{
        content_tokens, format_evidence, highlight, normalize_ws, query_keywords, tech_terms,
        trigram_similarity, truncate,
    };
}
