//! Compilation of listing filters into store and residual predicates
//!
//! Filters are split in two:
//!
//! - [`StorePredicate`]: everything the document store can evaluate natively
//!   (rating equality, title substring, stock text). It is pushed down into the
//!   store query.
//! - [`ResidualFilter`]: price bounds. Prices are stored as formatted strings
//!   (`"£51.77"`), so they can only be compared after fetching the candidates
//!   and deriving their numeric value.
//!
//! Raw query values are parsed leniently. A value that cannot be parsed is
//! treated as if it had not been sent; it never fails the request and never
//! empties the result set by accident.

use crate::core::book::{Book, is_in_stock};
use crate::core::query::BookQueryParams;
use serde::Serialize;

/// Stock state requested by the `inStock` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockFilter {
    /// Availability contains "in stock" (any case)
    InStock,
    /// Availability is absent or does not contain "in stock"
    OutOfStock,
}

impl StockFilter {
    pub fn matches(self, availability: Option<&str>) -> bool {
        match self {
            StockFilter::InStock => is_in_stock(availability),
            StockFilter::OutOfStock => !is_in_stock(availability),
        }
    }

    pub fn as_bool(self) -> bool {
        matches!(self, StockFilter::InStock)
    }
}

/// Filters the record store evaluates itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorePredicate {
    /// Exact match on `Rating`
    pub rating: Option<i32>,

    /// Case-insensitive literal substring of `Title`
    pub title_contains: Option<String>,

    pub stock: Option<StockFilter>,
}

impl StorePredicate {
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.title_contains.is_none() && self.stock.is_none()
    }

    /// Evaluate the predicate against a record
    ///
    /// Stores without a query language of their own use this directly; it is
    /// also the reference semantics the document store translation follows.
    pub fn matches(&self, book: &Book) -> bool {
        self.rating.is_none_or(|rating| book.rating == Some(rating))
            && self
                .title_contains
                .as_deref()
                .is_none_or(|needle| contains_ignore_case(&book.title, needle))
            && self
                .stock
                .is_none_or(|stock| stock.matches(book.availability.as_deref()))
    }
}

/// Filters applied after the fetch, on derived values
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResidualFilter {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ResidualFilter {
    pub fn is_empty(&self) -> bool {
        self.min_price.is_none() && self.max_price.is_none()
    }

    /// Inclusive price-range check on a derived numeric price
    pub fn accepts_price(&self, price: f64) -> bool {
        self.min_price.is_none_or(|min| price >= min)
            && self.max_price.is_none_or(|max| price <= max)
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.is_empty() || self.accepts_price(book.price_numeric())
    }
}

/// Echo of the filters that were recognized and applied
///
/// Filters that were not sent, or could not be parsed, serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    pub rating: Option<i32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub in_stock: Option<bool>,
    pub search: Option<String>,
}

/// Result of compiling a listing request's filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledQuery {
    pub predicate: StorePredicate,
    pub residual: ResidualFilter,
    pub applied: AppliedFilters,
}

impl CompiledQuery {
    /// Compile the filter parameters of a listing request
    pub fn compile(params: &BookQueryParams) -> Self {
        let rating = params.rating.as_deref().and_then(parse_integer);
        let search = params
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let stock = params.in_stock.as_deref().and_then(parse_stock);
        let min_price = params.min_price.as_deref().and_then(parse_bound);
        let max_price = params.max_price.as_deref().and_then(parse_bound);

        Self {
            predicate: StorePredicate {
                rating,
                title_contains: search.clone(),
                stock,
            },
            residual: ResidualFilter {
                min_price,
                max_price,
            },
            applied: AppliedFilters {
                rating,
                min_price,
                max_price,
                in_stock: stock.map(StockFilter::as_bool),
                search,
            },
        }
    }
}

fn parse_integer(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

fn parse_stock(raw: &str) -> Option<StockFilter> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(StockFilter::InStock)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(StockFilter::OutOfStock)
    } else {
        None
    }
}

/// Malformed or non-finite bounds disable the bound
fn parse_bound(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
