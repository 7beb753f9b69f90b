//! REST API exposure for the catalog
//!
//! The REST exposure consumes a `CatalogService` and produces an Axum `Router`
//! with the book routes, health checks, request tracing and CORS.

use crate::books::AppState;
use crate::core::CatalogService;
use crate::server::router::build_book_routes;
use anyhow::Result;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a catalog service
    ///
    /// # Arguments
    ///
    /// * `catalog` - The catalog service shared by all handlers
    /// * `custom_routes` - Additional custom routes to merge
    ///
    /// # Returns
    ///
    /// Returns a fully configured Axum router with:
    /// - Health check routes
    /// - Book routes
    /// - Custom routes
    pub fn build_router(catalog: CatalogService, custom_routes: Vec<Router>) -> Result<Router> {
        let state = AppState { catalog };

        let mut app = Self::health_routes().merge(build_book_routes(state));

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        // The browser frontend is served from another origin
        Ok(app
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http()))
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "catalog"
        }))
    }
}
