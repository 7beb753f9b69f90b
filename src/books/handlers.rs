//! HTTP handlers for the book endpoints
//!
//! Handlers only translate between HTTP and [`CatalogService`]; every failure
//! becomes a [`CatalogError`] response.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;

use crate::core::{
    AppliedFilters, BookQueryParams, BookView, CatalogError, CatalogService, PaginationMeta,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
}

/// Response for the list books endpoint
#[derive(Debug, Serialize)]
pub struct ListBooksResponse {
    pub success: bool,
    pub data: Vec<BookView>,
    pub pagination: PaginationMeta,
    pub filters: AppliedFilters,
}

/// Response for the get book endpoint
#[derive(Debug, Serialize)]
pub struct GetBookResponse {
    pub success: bool,
    pub data: BookView,
}

/// List books with filters, search and pagination
///
/// GET /api/books?page=&limit=&rating=&minPrice=&maxPrice=&inStock=&search=
///
/// The query string is taken as raw pairs so that no shape of it (repeated
/// keys included) is rejected before the lenient parsing in the service.
pub async fn list_books(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ListBooksResponse>, CatalogError> {
    let params = BookQueryParams::from_pairs(pairs);
    let listing = state.catalog.list_books(&params).await?;

    Ok(Json(ListBooksResponse {
        success: true,
        data: listing.page.items,
        pagination: listing.page.pagination,
        filters: listing.filters,
    }))
}

/// Get a single book by id, or by title fragment as a fallback
///
/// GET /api/books/{id}
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GetBookResponse>, CatalogError> {
    let book = state.catalog.get_book(&id).await?;

    Ok(Json(GetBookResponse {
        success: true,
        data: book,
    }))
}
