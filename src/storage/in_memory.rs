//! In-memory implementation of BookStore for testing and development

use crate::core::{Book, BookId, BookStore, StorePredicate};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// In-memory book store
///
/// Useful for testing and development. Records are kept in a `BTreeMap` keyed
/// by id, so every query returns them in id order.
#[derive(Clone, Debug)]
pub struct InMemoryBookStore {
    books: Arc<RwLock<BTreeMap<BookId, Book>>>,
}

impl InMemoryBookStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            books: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create a store holding the given records
    ///
    /// A later record with the same id replaces an earlier one.
    pub fn from_books(books: impl IntoIterator<Item = Book>) -> Self {
        let books = books.into_iter().map(|book| (book.id.clone(), book)).collect();
        Self {
            books: Arc::new(RwLock::new(books)),
        }
    }

    /// Load records from a JSON seed file
    ///
    /// The file holds an array of records in stored shape (`Title`, `Price`,
    /// `Availability`, `Rating`, ...). Records without an `_id` get a
    /// generated one.
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        Self::from_seed_json(&content)
            .with_context(|| format!("Invalid seed file {}", path.display()))
    }

    /// Load records from a JSON array string
    pub fn from_seed_json(json: &str) -> Result<Self> {
        let records: Vec<Value> = serde_json::from_str(json)?;
        let books = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| seed_record(record).with_context(|| format!("record #{index}")))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_books(books))
    }

    /// Number of records held
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<BookId, Book>>> {
        self.books
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))
    }
}

impl Default for InMemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_record(mut record: Value) -> Result<Book> {
    let object = record
        .as_object_mut()
        .ok_or_else(|| anyhow!("Expected a JSON object"))?;
    if object.get("_id").is_none_or(Value::is_null) {
        object.insert("_id".to_string(), Value::String(BookId::generate().into()));
    }
    Ok(serde_json::from_value(record)?)
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn find(&self, predicate: &StorePredicate) -> Result<Vec<Book>> {
        let books = self.read()?;

        Ok(books
            .values()
            .filter(|book| predicate.matches(book))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &BookId) -> Result<Option<Book>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn find_by_title(&self, fragment: &str) -> Result<Option<Book>> {
        let predicate = StorePredicate {
            title_contains: Some(fragment.to_string()),
            ..Default::default()
        };
        let books = self.read()?;

        Ok(books.values().find(|book| predicate.matches(book)).cloned())
    }
}
