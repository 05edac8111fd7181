//! HTTP mapping of request failures.

use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::RecommendError;

pub const CATALOG_NOT_LOADED: &str = "Server error: Product data not loaded.";
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Error body returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Wraps a [`RecommendError`] for the HTTP layer.
///
/// Clients only ever see one of two fixed messages; the underlying error
/// is logged.
#[derive(Debug)]
pub struct ApiError(pub RecommendError);

impl From<RecommendError> for ApiError {
    fn from(err: RecommendError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = match &self.0 {
            RecommendError::ServiceUnavailable { reason } => {
                error!("Rejecting request, catalog unavailable: {}", reason);
                CATALOG_NOT_LOADED
            }
            other => {
                error!("Recommendation request failed: {}", other);
                INTERNAL_SERVER_ERROR
            }
        };

        internal_error(detail)
    }
}

/// Response for a panic caught anywhere below the router
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    error!("Request handler panicked: {}", message);

    internal_error(INTERNAL_SERVER_ERROR)
}

fn internal_error(detail: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            detail: detail.to_string(),
        }),
    )
        .into_response()
}
