//! Router builder utilities for book routes

use crate::books::{AppState, get_book, list_books};
use axum::{Router, routing::get};

/// Build the book routes
///
/// - GET /api/books - Paginated, filterable listing
/// - GET /api/books/{id} - Single book by id (or title fragment)
pub fn build_book_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/books", get(list_books))
        .route("/api/books/{id}", get(get_book))
        .with_state(state)
}
