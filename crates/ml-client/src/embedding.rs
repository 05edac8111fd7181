//! Embedding client for OpenAI-compatible `/embeddings` endpoints.
//!
//! Any server speaking that API works, e.g. a text-embeddings-inference
//! container hosting `sentence-transformers/all-MiniLM-L6-v2`, which is the
//! model the product index was built with.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::http::{build_client, ensure_success, read_json, trim_base};
use crate::traits::Embedder;

const SERVICE: &str = "embedding service";

/// Settings for [`HttpEmbedder`]
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    /// Base URL, `/embeddings` is appended (e.g. `http://localhost:8080/v1`)
    pub base_url: String,
    pub model: String,
    /// Expected vector length; responses of another length are rejected
    pub dimensions: Option<usize>,
    /// Optional bearer token
    pub api_key: Option<String>,
    pub timeout: Duration,
}

/// Async embeddings client
#[derive(Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    dimensions: Option<usize>,
}

impl HttpEmbedder {
    pub fn new(config: EmbedderConfig) -> Result<Self> {
        if config.model.trim().is_empty() {
            return Err(ClientError::Config {
                service: SERVICE,
                reason: "missing embedding model name".into(),
            });
        }

        let auth = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(|key| format!("Bearer {}", key.trim()));
        let headers: Vec<(&'static str, &str, bool)> = auth
            .as_deref()
            .map(|value| vec![("authorization", value, true)])
            .unwrap_or_default();
        let client = build_client(SERVICE, config.timeout, &headers)?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", trim_base(&config.base_url)),
            model: config.model,
            dimensions: config.dimensions,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: [text],
        };
        let response = ensure_success(
            SERVICE,
            self.client.post(&self.endpoint).json(&request).send().await,
        )
        .await?;
        let parsed: EmbeddingResponse = read_json(SERVICE, response).await?;

        let embedding = parsed
            .data
            .into_iter()
            .min_by_key(|entry| entry.index)
            .map(|entry| entry.embedding)
            .ok_or_else(|| ClientError::invalid(SERVICE, "no embedding in response"))?;

        if let Some(expected) = self.dimensions {
            if embedding.len() != expected {
                return Err(ClientError::DimensionMismatch {
                    expected,
                    got: embedding.len(),
                });
            }
        }

        debug!("Embedded query into {} dimensions", embedding.len());
        Ok(embedding)
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}
