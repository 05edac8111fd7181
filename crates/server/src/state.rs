//! Service wiring
//!
//! Everything a request needs is built once, in a fixed order, and shared
//! read-only afterwards:
//! config -> catalog -> embedding client -> index client -> generative
//! client -> retriever -> generator -> orchestrator -> router.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tracing::{info, warn};

use catalog::CatalogStore;
use enrichment::DescriptionGenerator;
use ml_client::{
    EmbedderConfig, GeminiClient, GeminiConfig, HttpEmbedder, PineconeConfig, PineconeIndex,
};
use retriever::SemanticRetriever;

use crate::api;
use crate::config::Config;
use crate::orchestrator::RecommendationOrchestrator;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<RecommendationOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: RecommendationOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// The fully constructed service
pub struct ServiceContext {
    pub config: Config,
    pub state: AppState,
}

impl ServiceContext {
    /// Load the catalog from `config.catalog_path` and build the clients.
    ///
    /// A catalog that fails to load does not fail startup; the service
    /// comes up unready instead.
    pub fn from_config(config: Config) -> Result<Self> {
        let catalog = CatalogStore::load(&config.catalog_path);
        Self::with_catalog(config, catalog)
    }

    pub fn with_catalog(config: Config, catalog: CatalogStore) -> Result<Self> {
        match catalog.catalog() {
            Ok(loaded) => info!(
                "Catalog loaded from {:?} with {} products",
                config.catalog_path,
                loaded.len()
            ),
            Err(e) => warn!("Starting without a catalog, every recommendation will fail: {}", e),
        }

        let embedder = HttpEmbedder::new(EmbedderConfig {
            base_url: config.embedding_base_url.clone(),
            model: config.embedding_model.clone(),
            dimensions: Some(config.embedding_dimensions),
            api_key: config.embedding_api_key.clone(),
            timeout: config.upstream_timeout,
        })
        .context("Failed to build embedding client")?;

        let index = PineconeIndex::new(PineconeConfig {
            api_key: config.pinecone_api_key.clone(),
            index_name: config.pinecone_index.clone(),
            index_host: config.pinecone_index_host.clone(),
            control_url: config.pinecone_control_url.clone(),
            timeout: config.upstream_timeout,
        })
        .context("Failed to build Pinecone client")?;

        let gemini = GeminiClient::new(GeminiConfig {
            api_key: config.google_api_key.clone(),
            base_url: config.gemini_base_url.clone(),
            model: config.gemini_model.clone(),
            timeout: config.generation_timeout,
        })
        .context("Failed to build Gemini client")?;

        let retriever = SemanticRetriever::new(Arc::new(embedder), Arc::new(index));
        let describer =
            DescriptionGenerator::new(Arc::new(gemini)).with_timeout(config.generation_timeout);

        let orchestrator = RecommendationOrchestrator::new(catalog, retriever, describer)
            .with_top_k(config.top_k)
            .with_concurrency(config.generation_concurrency)
            .with_deadline(config.request_deadline);

        Ok(Self {
            config,
            state: AppState::new(orchestrator),
        })
    }

    pub fn orchestrator(&self) -> &RecommendationOrchestrator {
        &self.state.orchestrator
    }

    /// Routes with CORS for the configured origins and request tracing
    pub fn router(&self) -> Result<Router> {
        let cors = api::create_cors_layer(&self.config.allowed_origins)?;
        Ok(api::app(self.state.clone(), cors))
    }
}
