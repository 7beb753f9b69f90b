//! Residual filtering, page slicing and enrichment

use crate::core::book::{Book, BookView};
use crate::core::filter::ResidualFilter;
use crate::core::query::{Page, PageRequest, PaginationMeta};

/// Turn a candidate set into one enriched page
///
/// `candidates` must already satisfy the store predicate and be in a stable
/// order (stores return them sorted by id). The residual filter runs over the
/// whole set before slicing, so `totalBooks` and the page bounds reflect the
/// filtered total. Pages past the end are empty.
pub fn paginate(
    candidates: Vec<Book>,
    residual: &ResidualFilter,
    request: PageRequest,
) -> Page<BookView> {
    let filtered: Vec<Book> = if residual.is_empty() {
        candidates
    } else {
        candidates
            .into_iter()
            .filter(|book| residual.matches(book))
            .collect()
    };

    let total = filtered.len();
    let items = filtered
        .into_iter()
        .skip(request.start_index())
        .take(request.limit)
        .map(Book::enrich)
        .collect();

    Page {
        items,
        pagination: PaginationMeta::new(request.page, request.limit, total),
    }
}
