//! # Catalog
//!
//! A read-only book catalog API: paginated, filterable, searchable listings
//! and single-record lookup over a document store.
//!
//! ## Features
//!
//! - **Two-phase filtering**: rating, title search and stock state are pushed
//!   down to the store; price ranges are applied after fetching, on the numeric
//!   value derived from the stored `"£51.77"` strings
//! - **Stable pagination**: candidates are ordered by id, so pages partition
//!   the filtered set
//! - **Enrichment**: every returned record carries `priceNumeric` and `inStock`
//! - **Forgiving lookup**: `/api/books/{id}` falls back to a title fragment
//! - **Pluggable storage**: in-memory store, MongoDB behind `mongodb_backend`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use catalog::prelude::*;
//!
//! let store = InMemoryBookStore::from_books([
//!     Book::new("A Light in the Attic")
//!         .with_price("£51.77")
//!         .with_availability("In stock (22 available)")
//!         .with_rating(3),
//! ]);
//!
//! ServerBuilder::new()
//!     .with_store(store)
//!     .serve("127.0.0.1:3000")
//!     .await?;
//! ```

pub mod books;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        AppliedFilters, Book, BookId, BookListing, BookQueryParams, BookStore, BookView,
        CatalogError, CatalogService, CompiledQuery, Page, PageRequest, PaginationMeta,
        ResidualFilter, StockFilter, StorePredicate, is_in_stock, paginate, parse_price,
    };

    // === Storage ===
    pub use crate::storage::InMemoryBookStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoBookStore;

    // === Config ===
    pub use crate::config::{CatalogConfig, PaginationConfig, ServerConfig, StoreConfig};

    // === Server ===
    pub use crate::books::AppState;
    pub use crate::server::{RestExposure, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
