//! Clients for the external AI services the recommender depends on.
//!
//! This crate provides async HTTP clients for:
//! - the embedding service (OpenAI-compatible `/embeddings`)
//! - the Pinecone vector index (similarity search)
//! - the Gemini generative API (marketing copy)
//!
//! Each client implements one of the capability traits in [`traits`], which
//! is the only thing the rest of the workspace depends on. Clients carry a
//! per-call timeout and never retry; retry and degrade policy belongs to
//! the callers.

pub mod embedding;
pub mod error;
pub mod gemini;
mod http;
pub mod pinecone;
pub mod traits;

pub use embedding::{EmbedderConfig, HttpEmbedder};
pub use error::{ClientError, Result};
pub use gemini::{GeminiClient, GeminiConfig, GEMINI_BASE_URL, GEMINI_MODEL};
pub use pinecone::{PineconeConfig, PineconeIndex, PINECONE_CONTROL_URL};
pub use traits::{Embedder, ScoredMatch, TextGenerator, VectorIndex};
