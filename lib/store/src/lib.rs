//! # jobscout-store
//!
//! Storage layer for the jobscout retrieval engine: the in-memory posting
//! store with its parallel candidate scan, JSON snapshot persistence, and
//! the embedding backends. Implements the engine's `CandidateSource` and
//! `Embedder` contracts.

pub mod embed;
pub mod snapshot;
pub mod store;
pub mod vector;

pub use embed::{HashEmbedder, HttpEmbedder, DEFAULT_HASH_DIM, DEFAULT_HTTP_TIMEOUT};
pub use snapshot::StoreSnapshot;
pub use store::{FragmentInput, FragmentRecord, PostingStore, StoreConfig, StoreCounts};
pub use vector::{cosine_distance, normalize};
