//! Catalog server entry point

use anyhow::Context;
use catalog::config::CatalogConfig;
use catalog::server::ServerBuilder;
use catalog::storage;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CatalogConfig::load().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("catalog=info,tower_http=info")),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting catalog server");

    // The service cannot run without its store
    let store = storage::open(&config.store)
        .await
        .context("Failed to connect to the book store")?;

    ServerBuilder::new()
        .with_shared_store(store)
        .with_pagination(config.pagination)
        .serve(&config.server.bind_addr())
        .await
}
