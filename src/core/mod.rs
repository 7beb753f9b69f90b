//! Core module containing the catalog domain types and query pipeline

pub mod book;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod query;
pub mod service;
pub mod store;

pub use book::{Book, BookId, BookView, InvalidBookId, is_in_stock, parse_price};
pub use error::{CatalogError, ErrorResponse};
pub use filter::{AppliedFilters, CompiledQuery, ResidualFilter, StockFilter, StorePredicate};
pub use pagination::paginate;
pub use query::{BookQueryParams, Page, PageRequest, PaginationMeta};
pub use service::{BookListing, CatalogService};
pub use store::BookStore;
