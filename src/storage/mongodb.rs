//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoBookStore`, a read-only [`BookStore`] over one collection.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! catalog-rs = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! Records are the documents written by the ingestion scraper: one document per
//! book, keyed by a native `ObjectId`, with `Title`, `Price`, `Availability` and
//! `Rating` fields plus arbitrary extra attributes.
//!
//! # Serialization strategy
//!
//! Documents are converted to relaxed extended JSON and then deserialized into
//! [`Book`]. The `ObjectId` in `_id` is replaced by its hex string and dates
//! anywhere in the document become RFC 3339 strings first, so the domain type
//! never sees driver-specific values. Other BSON values pass through in their
//! relaxed JSON form.
//!
//! A listing skips (and logs) documents that cannot be read as a book rather
//! than failing the whole request.

use crate::core::{Book, BookId, BookStore, StockFilter, StorePredicate};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Client, Collection, Database};

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Case-insensitive literal substring match, as a `$regex` operator document
fn contains_ignore_case(text: &str) -> Document {
    doc! { "$regex": regex::escape(text), "$options": "i" }
}

/// Translate a store predicate into a MongoDB filter document.
fn predicate_to_filter(predicate: &StorePredicate) -> Document {
    let mut filter = Document::new();

    if let Some(rating) = predicate.rating {
        filter.insert("Rating", rating);
    }

    if let Some(search) = &predicate.title_contains {
        filter.insert("Title", contains_ignore_case(search));
    }

    match predicate.stock {
        Some(StockFilter::InStock) => {
            filter.insert("Availability", contains_ignore_case("in stock"));
        }
        Some(StockFilter::OutOfStock) => {
            filter.insert(
                "Availability",
                doc! { "$not": contains_ignore_case("in stock") },
            );
        }
        None => {}
    }

    filter
}

/// Replace every BSON date, at any depth, by its RFC 3339 string.
fn dates_to_rfc3339(value: Bson) -> Bson {
    match value {
        Bson::DateTime(date) => match date.try_to_rfc3339_string() {
            Ok(text) => Bson::String(text),
            Err(_) => Bson::DateTime(date),
        },
        Bson::Document(doc) => Bson::Document(
            doc.into_iter()
                .map(|(key, value)| (key, dates_to_rfc3339(value)))
                .collect(),
        ),
        Bson::Array(items) => Bson::Array(items.into_iter().map(dates_to_rfc3339).collect()),
        other => other,
    }
}

/// Convert a BSON Document into a [`Book`], replacing the `ObjectId` in `_id`
/// with its hex string.
fn document_to_book(mut doc: Document) -> Result<Book> {
    match doc.remove("_id") {
        Some(Bson::ObjectId(oid)) => {
            doc.insert("_id", oid.to_hex());
        }
        Some(other) => {
            doc.insert("_id", other);
        }
        None => return Err(anyhow!("Document has no _id")),
    }

    let json = dates_to_rfc3339(Bson::Document(doc)).into_relaxed_extjson();
    serde_json::from_value(json)
        .map_err(|e| anyhow!("Failed to deserialize book from document: {}", e))
}

/// Filter selecting one document by id: a native `ObjectId` when the id has
/// that format, the raw string otherwise.
fn id_filter(id: &BookId) -> Document {
    match ObjectId::parse_str(id.as_str()) {
        Ok(oid) => doc! { "_id": oid },
        Err(_) => doc! { "_id": id.as_str() },
    }
}

// ---------------------------------------------------------------------------
// MongoBookStore
// ---------------------------------------------------------------------------

/// Book store backed by a MongoDB collection.
///
/// # Example
///
/// ```rust,ignore
/// use catalog::storage::MongoBookStore;
///
/// let store = MongoBookStore::connect("mongodb://localhost:27017", "books_scraper", "books").await?;
/// let book = store.find_by_title("attic").await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoBookStore {
    database: Database,
    collection: String,
}

impl MongoBookStore {
    /// Create a new `MongoBookStore` over an existing database handle.
    pub fn new(database: Database, collection: impl Into<String>) -> Self {
        Self {
            database,
            collection: collection.into(),
        }
    }

    /// Connect to a MongoDB deployment and check that it answers.
    ///
    /// The driver connects lazily, so a `ping` is issued to surface an
    /// unreachable server at startup rather than on the first request.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| anyhow!("Failed to create MongoDB client: {}", e))?;
        let store = Self::new(client.database(database), collection);
        store.ping().await?;

        tracing::info!(database, collection, "Connected to MongoDB");
        Ok(store)
    }

    /// Round-trip a `ping` command to the server.
    pub async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| anyhow!("Failed to ping MongoDB: {}", e))?;
        Ok(())
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> Collection<Document> {
        self.database.collection(&self.collection)
    }
}

#[async_trait]
impl BookStore for MongoBookStore {
    /// Fetch every matching document, ordered by `_id`.
    async fn find(&self, predicate: &StorePredicate) -> Result<Vec<Book>> {
        let cursor = self
            .collection()
            .find(predicate_to_filter(predicate))
            .sort(doc! { "_id": 1 })
            .await
            .map_err(|e| anyhow!("Failed to query books: {}", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect books: {}", e))?;

        Ok(docs
            .into_iter()
            .filter_map(|doc| {
                let id = doc.get("_id").cloned();
                match document_to_book(doc) {
                    Ok(book) => Some(book),
                    Err(e) => {
                        tracing::warn!(?id, error = %e, "Skipping unreadable book document");
                        None
                    }
                }
            })
            .collect())
    }

    async fn get(&self, id: &BookId) -> Result<Option<Book>> {
        let doc = self
            .collection()
            .find_one(id_filter(id))
            .await
            .map_err(|e| anyhow!("Failed to get book: {}", e))?;

        doc.map(document_to_book).transpose()
    }

    async fn find_by_title(&self, fragment: &str) -> Result<Option<Book>> {
        let doc = self
            .collection()
            .find_one(doc! { "Title": contains_ignore_case(fragment) })
            .sort(doc! { "_id": 1 })
            .await
            .map_err(|e| anyhow!("Failed to find book by title: {}", e))?;

        doc.map(document_to_book).transpose()
    }
}

#[cfg(test)]
#[cfg(feature = "mongodb_backend")]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // predicate_to_filter
    // -----------------------------------------------------------------------

    #[test]
    fn empty_predicate_is_empty_filter() {
        assert_eq!(predicate_to_filter(&StorePredicate::default()), doc! {});
    }

    #[test]
    fn rating_is_exact_match() {
        let filter = predicate_to_filter(&StorePredicate {
            rating: Some(4),
            ..Default::default()
        });
        assert_eq!(filter, doc! { "Rating": 4 });
    }

    #[test]
    fn search_is_escaped_case_insensitive_regex() {
        let filter = predicate_to_filter(&StorePredicate {
            title_contains: Some("C++ (3rd ed.)".to_string()),
            ..Default::default()
        });
        assert_eq!(
            filter,
            doc! { "Title": { "$regex": r"C\+\+ \(3rd ed\.\)", "$options": "i" } }
        );
    }

    #[test]
    fn stock_filters() {
        let in_stock = predicate_to_filter(&StorePredicate {
            stock: Some(StockFilter::InStock),
            ..Default::default()
        });
        assert_eq!(
            in_stock,
            doc! { "Availability": { "$regex": "in stock", "$options": "i" } }
        );

        let out_of_stock = predicate_to_filter(&StorePredicate {
            stock: Some(StockFilter::OutOfStock),
            ..Default::default()
        });
        assert_eq!(
            out_of_stock,
            doc! { "Availability": { "$not": { "$regex": "in stock", "$options": "i" } } }
        );
    }

    // -----------------------------------------------------------------------
    // document_to_book
    // -----------------------------------------------------------------------

    #[test]
    fn document_to_book_maps_object_id() {
        let oid = ObjectId::parse_str("65a1b2c3d4e5f60718293a4b").unwrap();
        let doc = doc! {
            "_id": oid,
            "Title": "A Light in the Attic",
            "Price": "£51.77",
            "Availability": "In stock",
            "Rating": 3,
            "Page": 1,
        };

        let book = document_to_book(doc).unwrap();
        assert_eq!(book.id.as_str(), "65a1b2c3d4e5f60718293a4b");
        assert_eq!(book.rating, Some(3));
        assert_eq!(book.price_numeric(), 51.77);
        assert_eq!(book.attributes["Page"], 1);
    }

    #[test]
    fn document_to_book_requires_id() {
        let err = document_to_book(doc! { "Title": "orphan" }).unwrap_err();
        assert!(err.to_string().contains("_id"));
    }

    #[test]
    fn document_to_book_tolerates_irregular_fields() {
        let book = document_to_book(doc! {
            "_id": "book-1",
            "Title": Bson::Null,
            "Rating": 4.0,
            "Price": 51.77,
        })
        .unwrap();

        assert_eq!(book.id.as_str(), "book-1");
        assert_eq!(book.title, "");
        assert_eq!(book.rating, Some(4));
        assert_eq!(book.price_numeric(), 51.77);

        let book = document_to_book(doc! { "_id": 7_i64, "Rating": 3_i64 }).unwrap();
        assert_eq!(book.id.as_str(), "7");
        assert_eq!(book.rating, Some(3));
    }

    #[test]
    fn document_to_book_formats_dates() {
        let scraped = mongodb::bson::DateTime::parse_rfc3339_str("2024-03-01T12:30:00Z").unwrap();
        let book = document_to_book(doc! {
            "_id": ObjectId::new(),
            "Title": "Dated",
            "Scraped At": scraped,
            "History": [{ "at": scraped }],
        })
        .unwrap();

        let text = book.attributes["Scraped At"].as_str().unwrap();
        assert!(text.starts_with("2024-03-01T12:30:00"), "{text}");
        assert!(
            book.attributes["History"][0]["at"]
                .as_str()
                .is_some_and(|t| t.starts_with("2024-03-01T12:30:00"))
        );
    }

    #[test]
    fn id_filter_uses_native_object_id() {
        let id = BookId::parse("65a1b2c3d4e5f60718293a4b").unwrap();
        assert_eq!(
            id_filter(&id),
            doc! { "_id": ObjectId::parse_str("65a1b2c3d4e5f60718293a4b").unwrap() }
        );

        let id = BookId::from("book-1".to_string());
        assert_eq!(id_filter(&id), doc! { "_id": "book-1" });
    }
}
