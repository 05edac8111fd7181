//! Semantic Retriever - free-text query to ranked product identifiers
//!
//! ## Algorithm
//! 1. Embed the query with the external embedding service
//! 2. Run a top-K similarity search against the product vector index
//! 3. Keep the identifiers in the index's rank order, drop scores
//!
//! Failures of either external call degrade to an empty ranking; the caller
//! reads "empty" as "no matches", never as an error.

use std::sync::Arc;

use catalog::ProductId;
use ml_client::{ClientError, Embedder, VectorIndex};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Number of products a recommendation asks for unless configured otherwise
pub const DEFAULT_TOP_K: usize = 5;

/// Why a retrieval produced no ranking
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("embedding failed: {0}")]
    Embedding(#[source] ClientError),

    #[error("vector index query failed: {0}")]
    Index(#[source] ClientError),
}

/// Turns a text query into a ranked list of product identifiers
#[derive(Clone)]
pub struct SemanticRetriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
}

impl SemanticRetriever {
    /// Create a retriever over an embedding service and a vector index
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Ranked identifiers, most similar first, at most `top_k` of them.
    ///
    /// Never fails: upstream errors are logged and yield an empty list.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Vec<ProductId> {
        match self.try_retrieve(query, top_k).await {
            Ok(ids) => {
                debug!("Retrieved {} product ids", ids.len());
                ids
            }
            Err(e) => {
                warn!("Semantic retrieval degraded to no matches: {}", e);
                Vec::new()
            }
        }
    }

    /// Same as [`retrieve`](Self::retrieve) but surfaces the upstream error
    pub async fn try_retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ProductId>, RetrievalError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(RetrievalError::Embedding)?;

        let matches = self
            .index
            .query(&embedding, top_k)
            .await
            .map_err(RetrievalError::Index)?;

        Ok(matches.into_iter().take(top_k).map(|m| m.id).collect())
    }
}
