//! Typed error handling for the catalog API
//!
//! Every failure on the request path ends up as a [`CatalogError`], which
//! renders the `{ success: false, message, error? }` envelope:
//!
//! - [`CatalogError::NotFound`]: the expected "no such book" outcome (404).
//! - [`CatalogError::Storage`]: the record store failed (500). The `error`
//!   field carries diagnostic text only; it is not a stable contract.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// The error type of the catalog service
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// No record matched the lookup
    #[error("Book not found")]
    NotFound,

    /// The record store failed
    #[error("storage failure: {0:#}")]
    Storage(anyhow::Error),
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        CatalogError::Storage(err)
    }
}

/// Error envelope returned to HTTP clients
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable error message
    pub message: String,
    /// Diagnostic detail for server-side failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CatalogError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::NotFound => StatusCode::NOT_FOUND,
            CatalogError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            CatalogError::NotFound => ErrorResponse {
                success: false,
                message: "Book not found".to_string(),
                error: None,
            },
            CatalogError::Storage(err) => ErrorResponse {
                success: false,
                message: "Internal server error".to_string(),
                error: Some(format!("{err:#}")),
            },
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        if let CatalogError::Storage(err) = &self {
            tracing::error!(error = %format!("{err:#}"), "Request failed");
        }

        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}
