//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use crate::config::PaginationConfig;
use crate::core::{BookStore, CatalogService};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the catalog HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryBookStore::new())
///     .with_pagination(PaginationConfig::default())
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn BookStore>>,
    pagination: PaginationConfig,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            pagination: PaginationConfig::default(),
            custom_routes: Vec::new(),
        }
    }

    /// Set the book store (required)
    pub fn with_store(self, store: impl BookStore + 'static) -> Self {
        self.with_shared_store(Arc::new(store))
    }

    /// Set an already shared book store (required)
    pub fn with_shared_store(mut self, store: Arc<dyn BookStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the page size limits of the listing endpoint
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Add custom routes to the server
    ///
    /// # Example
    ///
    /// ```ignore
    /// use axum::{Router, routing::get};
    ///
    /// let extra = Router::new().route("/version", get(|| async { env!("CARGO_PKG_VERSION") }));
    ///
    /// ServerBuilder::new()
    ///     .with_store(store)
    ///     .with_custom_routes(extra)
    ///     .build()?;
    /// ```
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the transport-agnostic catalog service
    pub fn build_service(&mut self) -> Result<CatalogService> {
        let store = self
            .store
            .take()
            .ok_or_else(|| anyhow::anyhow!("BookStore is required. Call .with_store()"))?;

        Ok(CatalogService::new(store, self.pagination))
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let catalog = self.build_service()?;
        let custom_routes = std::mem::take(&mut self.custom_routes);
        RestExposure::build_router(catalog, custom_routes)
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_store(store)
    ///     .serve("127.0.0.1:3000").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on http://{}", addr);
        tracing::info!("  GET /api/books       - List books with filters");
        tracing::info!("  GET /api/books/{{id}}  - Get a single book");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}


/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
