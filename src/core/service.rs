//! The catalog service: listing and single-record lookup

use crate::config::PaginationConfig;
use crate::core::book::{BookId, BookView};
use crate::core::error::CatalogError;
use crate::core::filter::{AppliedFilters, CompiledQuery};
use crate::core::pagination::paginate;
use crate::core::query::{BookQueryParams, Page, PageRequest};
use crate::core::store::BookStore;
use std::sync::Arc;

/// One page of a listing together with the filters that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct BookListing {
    pub page: Page<BookView>,
    pub filters: AppliedFilters,
}

/// Read-only catalog operations over a [`BookStore`]
///
/// Cheap to clone; the store handle is shared.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn BookStore>,
    pagination: PaginationConfig,
}

impl CatalogService {
    pub fn new(store: Arc<dyn BookStore>, pagination: PaginationConfig) -> Self {
        Self { store, pagination }
    }

    pub fn store(&self) -> &Arc<dyn BookStore> {
        &self.store
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    /// List one page of books matching the request's filters
    pub async fn list_books(&self, params: &BookQueryParams) -> Result<BookListing, CatalogError> {
        let compiled = CompiledQuery::compile(params);
        let request = PageRequest::from_params(params, &self.pagination);

        tracing::debug!(
            predicate = ?compiled.predicate,
            residual = ?compiled.residual,
            page = request.page,
            limit = request.limit,
            "Listing books"
        );

        let candidates = self.store.find(&compiled.predicate).await?;
        let page = paginate(candidates, &compiled.residual, request);

        Ok(BookListing {
            page,
            filters: compiled.applied,
        })
    }

    /// Look up one book by id, falling back to a title fragment
    ///
    /// An identifier in the store's native format is tried first. If it is not
    /// in that format, or no record has that id, the first book whose title
    /// contains the identifier (ignoring case) is returned instead.
    pub async fn get_book(&self, raw_id: &str) -> Result<BookView, CatalogError> {
        if let Ok(id) = BookId::parse(raw_id) {
            if let Some(book) = self.store.get(&id).await? {
                return Ok(book.enrich());
            }
            tracing::debug!(%id, "No book with this id, trying title fallback");
        }

        if raw_id.is_empty() {
            return Err(CatalogError::NotFound);
        }

        self.store
            .find_by_title(raw_id)
            .await?
            .map(|book| book.enrich())
            .ok_or(CatalogError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::book::Book;
    use crate::storage::InMemoryBookStore;

    const KNOWN_ID: &str = "000000000000000000000001";

    fn service() -> CatalogService {
        let store = InMemoryBookStore::from_books([
            Book::new("Tipping the Velvet")
                .with_id(BookId::parse(KNOWN_ID).unwrap())
                .with_rating(1)
                .with_price("£53.74")
                .with_availability("In stock"),
            Book::new("Soumission")
                .with_id(BookId::parse("000000000000000000000002").unwrap())
                .with_rating(1)
                .with_price("£50.10")
                .with_availability("Out of stock"),
            // Title that looks like the id of the first book
            Book::new(format!("Notes on {KNOWN_ID}"))
                .with_id(BookId::parse("000000000000000000000003").unwrap())
                .with_rating(4)
                .with_price("£12.00")
                .with_availability("In stock"),
        ]);
        CatalogService::new(Arc::new(store), PaginationConfig::default())
    }

    #[tokio::test]
    async fn test_get_book_by_id() {
        let view = service().get_book(KNOWN_ID).await.unwrap();
        assert_eq!(view.book.title, "Tipping the Velvet");
        assert_eq!(view.price_numeric, 53.74);
        assert!(view.in_stock);
    }

    #[tokio::test]
    async fn test_id_match_wins_over_title_match() {
        // Both the id of book 1 and the title of book 3 match
        let view = service().get_book(KNOWN_ID).await.unwrap();
        assert_eq!(view.book.id.as_str(), KNOWN_ID);
    }

    #[tokio::test]
    async fn test_get_book_by_title_fragment() {
        let view = service().get_book("soumis").await.unwrap();
        assert_eq!(view.book.title, "Soumission");
        assert!(!view.in_stock);
    }

    #[tokio::test]
    async fn test_unknown_id_without_title_match_is_not_found() {
        let err = service()
            .get_book("ffffffffffffffffffffffff")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
    }

    #[tokio::test]
    async fn test_get_book_not_found() {
        let err = service().get_book("no such book").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));

        let err = service().get_book("").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
    }

    #[tokio::test]
    async fn test_list_books_echoes_filters() {
        let params = BookQueryParams {
            rating: Some("1".to_string()),
            max_price: Some("51".to_string()),
            min_price: Some("oops".to_string()),
            ..Default::default()
        };
        let listing = service().list_books(&params).await.unwrap();

        assert_eq!(listing.page.pagination.total_books, 1);
        assert_eq!(listing.page.items[0].book.title, "Soumission");
        assert_eq!(listing.filters.rating, Some(1));
        assert_eq!(listing.filters.max_price, Some(51.0));
        assert_eq!(listing.filters.min_price, None);
    }
}
