//! Health check endpoints

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

pub const SERVICE_NAME: &str = "recs-server";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy"))
}

/// Ready only when the catalog snapshot loaded at startup
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if state.orchestrator.is_ready() {
        (StatusCode::OK, Json(HealthResponse::new("ready")))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse::new("unavailable")),
        )
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
}
