//! Server crate for the product recommendation service.
//!
//! This crate contains the orchestrator that coordinates catalog lookup,
//! semantic retrieval and description generation, plus the HTTP API and
//! service wiring shared by the `recs-server` and `product-recs` binaries.

pub mod api;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod shutdown;
pub mod state;

pub use config::Config;
pub use error::RecommendError;
pub use orchestrator::RecommendationOrchestrator;
pub use state::{AppState, ServiceContext};

use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info,server=debug,retriever=debug,enrichment=debug";

/// Install the global `tracing` subscriber
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
