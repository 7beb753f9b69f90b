//! Query parameters and pagination utilities

use crate::config::PaginationConfig;
use serde::Serialize;

/// Query parameters of the book listing endpoint
///
/// Values are kept as raw strings and parsed leniently later, so a malformed
/// value degrades to its default instead of rejecting the whole request. A
/// repeated key keeps its first value.
///
/// # Example
/// ```text
/// GET /api/books?page=2&limit=10
/// GET /api/books?rating=4&inStock=true
/// GET /api/books?minPrice=10&maxPrice=50&search=light
/// ```
#[derive(Debug, Clone, Default)]
pub struct BookQueryParams {
    /// Page number (starts at 1)
    pub page: Option<String>,

    /// Number of items per page
    pub limit: Option<String>,

    /// Exact star rating
    pub rating: Option<String>,

    /// Inclusive lower bound on the numeric price
    pub min_price: Option<String>,

    /// Inclusive upper bound on the numeric price
    pub max_price: Option<String>,

    /// `"true"` or `"false"`
    pub in_stock: Option<String>,

    /// Case-insensitive title substring
    pub search: Option<String>,
}

impl BookQueryParams {
    /// Collect parameters from decoded query string pairs
    ///
    /// Unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();

        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "rating" => &mut params.rating,
                "minPrice" => &mut params.min_price,
                "maxPrice" => &mut params.max_price,
                "inStock" => &mut params.in_stock,
                "search" => &mut params.search,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }

        params
    }
}

/// A validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, at least 1
    pub page: usize,

    /// Page size, at least 1
    pub limit: usize,
}

impl PageRequest {
    /// Resolve the page window of a request
    ///
    /// Missing, malformed or non-positive values fall back to page 1 and the
    /// configured default limit. When a maximum is configured, larger limits
    /// are clamped to it.
    pub fn from_params(params: &BookQueryParams, config: &PaginationConfig) -> Self {
        let page = params
            .page
            .as_deref()
            .and_then(parse_positive)
            .unwrap_or(1);
        let limit = params
            .limit
            .as_deref()
            .and_then(parse_positive)
            .unwrap_or(config.default_limit)
            .max(1);
        let limit = match config.max_limit {
            Some(max) => limit.min(max.max(1)),
            None => limit,
        };

        Self { page, limit }
    }

    /// Index of the first item of the page
    pub fn start_index(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn parse_positive(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n >= 1)
}

/// One page of results with its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// The items on this page
    pub items: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub current_page: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Total number of books (after all filters)
    pub total_books: usize,

    /// Whether there is a next page
    pub has_next_page: bool,

    /// Whether there is a previous page
    pub has_prev_page: bool,

    /// Number of items per page
    pub limit: usize,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        // Ensure limit is at least 1 to avoid division by zero
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit);

        Self {
            current_page: page,
            total_pages,
            total_books: total,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
            limit,
        }
    }
}
