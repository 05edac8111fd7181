//! Recommendation endpoints

use axum::{Json, extract::State};
use enrichment::NormalizedProduct;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub products: Vec<NormalizedProduct>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the Product Recommendation API! (Real Models Loaded)".to_string(),
    })
}

pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let products = state.orchestrator.recommend(&request.query).await?;
    Ok(Json(RecommendResponse { products }))
}

// Placeholder until analytics exist
pub async fn analytics() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Analytics data will go here.".to_string(),
    })
}
