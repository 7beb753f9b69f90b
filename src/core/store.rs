//! Record store abstraction

use crate::core::book::{Book, BookId};
use crate::core::filter::StorePredicate;
use anyhow::Result;
use async_trait::async_trait;

/// Read access to the book records
///
/// Implementations are shared across requests behind an `Arc` and must never
/// mutate records. Multi-record results are ordered by id ascending so that
/// slicing the same query into pages is stable.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Every record matching the predicate, ordered by id
    async fn find(&self, predicate: &StorePredicate) -> Result<Vec<Book>>;

    /// The record with this id, if any
    async fn get(&self, id: &BookId) -> Result<Option<Book>>;

    /// The first record (by id) whose title contains `fragment`, ignoring case
    ///
    /// `fragment` is matched literally, never as a pattern.
    async fn find_by_title(&self, fragment: &str) -> Result<Option<Book>>;
}
