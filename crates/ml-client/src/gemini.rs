//! Google Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::http::{build_client, ensure_success, read_json, trim_base};
use crate::traits::TextGenerator;

const SERVICE: &str = "Gemini";

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Settings for [`GeminiClient`]
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ClientError::Config {
                service: SERVICE,
                reason: "missing Google API key".into(),
            });
        }
        let model = config.model.trim();
        if model.is_empty() {
            return Err(ClientError::Config {
                service: SERVICE,
                reason: "missing Gemini model name".into(),
            });
        }

        let client = build_client(
            SERVICE,
            config.timeout,
            &[("x-goog-api-key", config.api_key.as_str(), true)],
        )?;
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            trim_base(&config.base_url),
            model
        );
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };
        let response = ensure_success(
            SERVICE,
            self.client.post(&self.endpoint).json(&request).send().await,
        )
        .await?;
        let parsed: GenerateResponse = read_json(SERVICE, response).await?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::invalid(SERVICE, "response has no candidates"))?;
        let texts: Vec<String> = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        if texts.is_empty() {
            return Err(ClientError::invalid(SERVICE, "candidate has no text parts"));
        }

        let text = texts.concat();
        debug!("Gemini generated {} characters", text.len());
        Ok(text)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
