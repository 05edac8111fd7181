//! Pinecone vector index client.
//!
//! Queries go to the index's data-plane host. When the host isn't
//! configured it is looked up once through the control plane
//! (`GET /indexes/{name}`) and cached; a failed lookup is retried on the
//! next query rather than poisoning the client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::error::{ClientError, Result};
use crate::http::{build_client, ensure_success, read_json, trim_base};
use crate::traits::{ScoredMatch, VectorIndex};

const SERVICE: &str = "Pinecone";
const API_VERSION: &str = "2024-07";

/// Default control-plane URL
pub const PINECONE_CONTROL_URL: &str = "https://api.pinecone.io";

/// Settings for [`PineconeIndex`]
#[derive(Debug, Clone)]
pub struct PineconeConfig {
    pub api_key: String,
    pub index_name: String,
    /// Data-plane host; resolved through the control plane when `None`
    pub index_host: Option<String>,
    pub control_url: String,
    pub timeout: Duration,
}

pub struct PineconeIndex {
    client: reqwest::Client,
    index_name: String,
    control_url: String,
    host: OnceCell<String>,
}

impl PineconeIndex {
    pub fn new(config: PineconeConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ClientError::Config {
                service: SERVICE,
                reason: "missing Pinecone API key".into(),
            });
        }
        if config.index_name.trim().is_empty() {
            return Err(ClientError::Config {
                service: SERVICE,
                reason: "missing Pinecone index name".into(),
            });
        }

        let client = build_client(
            SERVICE,
            config.timeout,
            &[
                ("api-key", config.api_key.as_str(), true),
                ("x-pinecone-api-version", API_VERSION, false),
            ],
        )?;

        let host = match config.index_host.as_deref().map(str::trim) {
            Some(host) if !host.is_empty() => OnceCell::new_with(Some(with_scheme(host))),
            _ => OnceCell::new(),
        };

        Ok(Self {
            client,
            index_name: config.index_name,
            control_url: trim_base(&config.control_url),
            host,
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Data-plane base URL, resolving it on first use
    pub async fn host(&self) -> Result<&str> {
        self.host
            .get_or_try_init(|| self.describe_index())
            .await
            .map(String::as_str)
    }

    async fn describe_index(&self) -> Result<String> {
        let url = format!("{}/indexes/{}", self.control_url, self.index_name);
        debug!("Resolving Pinecone index host via {}", url);

        let response = ensure_success(SERVICE, self.client.get(&url).send().await).await?;
        let description: IndexDescription = read_json(SERVICE, response).await?;
        let host = description
            .host
            .filter(|host| !host.trim().is_empty())
            .ok_or_else(|| ClientError::invalid(SERVICE, "index description has no host"))?;

        info!("Pinecone index '{}' served from {}", self.index_name, host);
        Ok(with_scheme(&host))
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ScoredMatch>> {
        let url = format!("{}/query", self.host().await?);
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: false,
            include_values: false,
        };

        let response =
            ensure_success(SERVICE, self.client.post(&url).json(&request).send().await).await?;
        let parsed: QueryResponse = read_json(SERVICE, response).await?;

        debug!("Pinecone returned {} matches (top_k={})", parsed.matches.len(), top_k);
        Ok(parsed
            .matches
            .into_iter()
            .map(|m| ScoredMatch::new(m.id, m.score))
            .collect())
    }
}

/// Hosts from the control plane come without a scheme
fn with_scheme(host: &str) -> String {
    let host = trim_base(host);
    if host.starts_with("http://") || host.starts_with("https://") {
        host
    } else {
        format!("https://{}", host)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    host: Option<String>,
}
