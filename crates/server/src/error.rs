//! Request-level failures of the recommendation pipeline.
//!
//! Upstream AI failures never show up here: retrieval degrades to an empty
//! ranking and generation to a fallback description before reaching the
//! orchestrator.

use std::time::Duration;

use catalog::CatalogError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommendError {
    /// The catalog snapshot failed to load at startup
    #[error("product catalog not loaded: {reason}")]
    ServiceUnavailable { reason: String },

    /// The index ranked a product the catalog doesn't know
    #[error("ranked product {id} is missing from the catalog")]
    NotFound { id: String },

    /// The whole request ran past its deadline
    #[error("request deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CatalogError> for RecommendError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Unavailable { reason } => RecommendError::ServiceUnavailable { reason },
            CatalogError::NotFound { id } => RecommendError::NotFound { id },
            other => RecommendError::Internal(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;
