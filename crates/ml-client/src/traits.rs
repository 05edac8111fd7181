//! Capability traits for the external AI services.
//!
//! The retriever and the description generator only see these traits, so
//! tests (and alternative providers) can swap the HTTP clients out.

use async_trait::async_trait;

use crate::error::Result;

/// Turns text into a fixed-length embedding vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// One hit of a similarity search
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    pub id: String,
    pub score: f32,
}

impl ScoredMatch {
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

/// Top-K similarity search over stored product vectors.
///
/// Matches come back in the index's rank order (most similar first).
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredMatch>>;
}

/// Free-text generation from a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
