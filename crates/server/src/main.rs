//! `recs-server`: HTTP front end of the product recommendation service.

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use server::config::load_env_file;
use server::shutdown::shutdown_signal;
use server::{Config, ServiceContext};

#[tokio::main]
async fn main() -> Result<()> {
    // Loaded before tracing so RUST_LOG may come from the file
    let env_file = load_env_file()?;
    server::init_tracing();
    if let Some(path) = env_file {
        info!("Loaded environment from {}", path.display());
    }

    let config = Config::from_env().context("Invalid configuration")?;
    info!("Starting recs-server with {:?}", config);

    let context = ServiceContext::from_config(config)?;
    let app = context.router()?;

    let address = context.config.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}
