//! # jobscout-text
//!
//! Text analysis primitives for the jobscout retrieval engine:
//!
//! - [`tokens`] - query tokenization, stopword filtering, keyword ranking
//! - [`terms`] - recognition of technology/tool terms via ordered patterns
//! - [`highlight`] - whitespace normalization, keyword highlighting, truncation
//! - [`trigram`] - character-trigram lexical similarity (pg_trgm style)
//!
//! Everything here is a pure function over the input text and static tables;
//! there is no configuration and no I/O. Both Latin and Cyrillic text are
//! handled throughout.

pub mod highlight;
pub mod terms;
pub mod tokens;
pub mod trigram;

pub use highlight::{format_evidence, highlight, normalize_ws, truncate};
pub use terms::tech_terms;
pub use tokens::{content_tokens, query_keywords};
pub use trigram::similarity as trigram_similarity;
