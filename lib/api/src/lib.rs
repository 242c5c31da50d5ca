//! # jobscout-api
//!
//! REST surface for the jobscout retrieval engine: search and ask,
//! corpus stats, market analytics, and the posting ingest endpoints.

pub mod rest;

pub use rest::{AppState, RestApi};
