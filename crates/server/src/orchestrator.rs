//! # Recommendation Orchestrator
//!
//! This module coordinates one recommendation request:
//! 1. Fail fast when the catalog is unavailable
//! 2. Retrieve ranked product ids for the query (degrades to empty)
//! 3. Look up every ranked id in the catalog (a missing id fails the request)
//! 4. Generate descriptions with bounded concurrency (degrades per item)
//! 5. Normalize fields and return the products in rank order
//!
//! The whole pipeline runs under an optional deadline.

use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument};

use catalog::{CatalogStore, ProductRecord};
use enrichment::{DescriptionGenerator, NormalizedProduct};
use retriever::{SemanticRetriever, DEFAULT_TOP_K};

use crate::error::{RecommendError, Result};

/// Descriptions generated at once for a single request
pub const DEFAULT_GENERATION_CONCURRENCY: usize = 4;

/// Main orchestrator that coordinates the recommendation pipeline
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    catalog: CatalogStore,
    retriever: SemanticRetriever,
    describer: DescriptionGenerator,
    top_k: usize,
    concurrency: usize,
    deadline: Option<Duration>,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator over an already loaded catalog and the two
    /// AI collaborators. No deadline is applied until one is configured.
    pub fn new(
        catalog: CatalogStore,
        retriever: SemanticRetriever,
        describer: DescriptionGenerator,
    ) -> Self {
        Self {
            catalog,
            retriever,
            describer,
            top_k: DEFAULT_TOP_K,
            concurrency: DEFAULT_GENERATION_CONCURRENCY,
            deadline: None,
        }
    }

    /// Number of products requested from the retriever (default: 5)
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Descriptions generated concurrently, 1 means sequential (default: 4)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Upper bound for one whole request
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn is_ready(&self) -> bool {
        self.catalog.is_available()
    }

    /// Main entry point: ranked, enriched products for a free-text query
    ///
    /// # Returns
    /// Products in the retriever's rank order. An empty list means no
    /// matches, including when retrieval itself degraded.
    #[instrument(skip(self))]
    pub async fn recommend(&self, query: &str) -> Result<Vec<NormalizedProduct>> {
        let start_time = Instant::now();

        let products = match self.deadline {
            Some(limit) => tokio::time::timeout(limit, self.run(query))
                .await
                .map_err(|_| RecommendError::DeadlineExceeded(limit))??,
            None => self.run(query).await?,
        };

        info!(
            "Recommended {} products in {:.2?}",
            products.len(),
            start_time.elapsed()
        );
        Ok(products)
    }

    async fn run(&self, query: &str) -> Result<Vec<NormalizedProduct>> {
        // Checked before retrieval so nothing upstream is called
        let catalog = self.catalog.catalog()?;

        let ids = self.retriever.retrieve(query, self.top_k).await;
        if ids.is_empty() {
            info!("No products matched the query");
            return Ok(Vec::new());
        }
        debug!("Retriever ranked {} products", ids.len());

        // Resolve every id before spending generation quota
        let records: Vec<ProductRecord> = catalog.lookup(&ids)?.into_iter().cloned().collect();

        Ok(self.enrich(records).await)
    }

    /// Attach descriptions, keeping input order
    async fn enrich(&self, records: Vec<ProductRecord>) -> Vec<NormalizedProduct> {
        let describer = self.describer.clone();

        stream::iter(records)
            .map(move |record| {
                let describer = describer.clone();
                async move {
                    let description = describer.generate(&record.title).await;
                    NormalizedProduct::from_record(&record, description)
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }
}
