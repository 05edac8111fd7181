//! # Retriever Crate
//!
//! Semantic product retrieval: a free-text query goes through the embedding
//! service, the embedding through the vector index, and what comes back is
//! a ranked list of product identifiers.
//!
//! ## Example Usage
//!
//! ```ignore
//! use retriever::SemanticRetriever;
//! use std::sync::Arc;
//!
//! let retriever = SemanticRetriever::new(Arc::new(embedder), Arc::new(index));
//! let ids = retriever.retrieve("cozy winter blanket", 5).await;
//! ```
//!
//! Upstream failures never reach the caller: they are logged and the
//! ranking comes back empty.

pub mod semantic;

pub use semantic::{RetrievalError, SemanticRetriever, DEFAULT_TOP_K};
