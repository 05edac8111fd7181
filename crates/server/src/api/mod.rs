//! HTTP API routes

pub mod cors;
pub mod error;
pub mod health;
pub mod recommend;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub use cors::create_cors_layer;
pub use error::{ApiError, ErrorResponse};
pub use health::HealthResponse;
pub use recommend::{MessageResponse, RecommendRequest, RecommendResponse};

/// Application routes without middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(recommend::root))
        .route("/recommend", post(recommend::recommend))
        .route("/analytics", get(recommend::analytics))
        .merge(health::router())
        .with_state(state)
}

/// Routes wrapped in panic recovery, CORS and request tracing.
///
/// Panics become the fixed 500 body and still carry CORS headers.
pub fn app(state: AppState, cors: CorsLayer) -> Router {
    router(state)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
