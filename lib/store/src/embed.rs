//! Embedding backends.
//!
//! [`HashEmbedder`] is the self-contained default: a deterministic feature
//! hash over character trigrams and words, good enough to run the full
//! pipeline without an external model. [`HttpEmbedder`] delegates to an
//! OpenAI-compatible embeddings endpoint for real semantic vectors.

use std::time::Duration;

use async_trait::async_trait;
use jobscout_engine::{Embedder, Error, Result};
use jobscout_text::trigram::trigram_set;
use serde::Deserialize;
use tracing::debug;

use crate::vector::normalize;

/// Default dimension for hashed embeddings.
pub const DEFAULT_HASH_DIM: usize = 256;

/// Deterministic hashing embedder. Same text always maps to the same unit
/// vector; no model, no I/O.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    #[inline]
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn hash_to_vector(&self, text: &str) -> Vec<f32> {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut vector = vec![0.0f32; self.dim];
        let normalized = text.to_lowercase();

        for trigram in trigram_set(&normalized) {
            let mut hasher = DefaultHasher::new();
            trigram.hash(&mut hasher);
            let pos = (hasher.finish() as usize) % self.dim;
            vector[pos] += 1.0;
        }

        // Whole words carry more signal than individual trigrams.
        for word in normalized.split_whitespace() {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            let pos = (hasher.finish() as usize) % self.dim;
            vector[pos] += 2.0;
        }

        normalize(&mut vector);
        vector
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_DIM)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.hash_to_vector(text))
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

/// Per-request budget for the embeddings endpoint. Callers outside the
/// retrieval path (ingest) have no other timeout around `embed`.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for an OpenAI-compatible `/embeddings` endpoint.
pub struct HttpEmbedder {
    client: reqwest::Client,
    url: String,
    model: String,
    dim: usize,
    timeout: Duration,
}

impl HttpEmbedder {
    #[must_use]
    pub fn new(url: impl Into<String>, model: impl Into<String>, dim: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            model: model.into(),
            dim,
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
        });
        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Embedding(format!(
                "embedding endpoint returned {}",
                response.status()
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?;
        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| Error::Embedding("empty embedding response".to_string()))?;

        if vector.len() != self.dim {
            return Err(Error::InvalidDimension {
                expected: self.dim,
                actual: vector.len(),
            });
        }
        debug!(chars = text.chars().count(), "embedded via http");
        Ok(vector)
    }

    fn dim(&self) -> usize {
        self.dim
    }
}
