//! Book records and their derived view fields
//!
//! A [`Book`] is the record as the document store holds it. The stored key
//! names (`_id`, `Title`, `Rating`, `Price`, `Availability`, ...) are kept on the
//! wire so clients see the same document shape the ingestion pipeline wrote.
//!
//! A [`BookView`] is a record decorated with the two computed fields,
//! `priceNumeric` and `inStock`. They are recomputed on every read and never
//! written back.
//!
//! Reading a record never fails on the type of a known field: a null or
//! non-string `Title`, `Price` or `Availability` and a non-integer `Rating`
//! are read as absent (numbers in text fields are kept as their decimal text).

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Store-assigned book identifier
///
/// Any stored id is accepted as an opaque string. Ids in the document store's
/// native object id format (24 hexadecimal characters) are normalised to
/// lowercase so that ordering by id is the same in every store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct BookId(String);

/// Returned when a string is not in the store's native identifier format
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid book id (expected 24 hex characters)")]
pub struct InvalidBookId(pub String);

impl BookId {
    const LEN: usize = 24;

    /// Parse an identifier in the native format, rejecting anything that is
    /// not 24 hex characters
    ///
    /// This is the check applied to ids supplied by clients.
    pub fn parse(raw: &str) -> Result<Self, InvalidBookId> {
        if Self::is_native(raw) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(InvalidBookId(raw.to_string()))
        }
    }

    fn is_native(raw: &str) -> bool {
        raw.len() == Self::LEN && raw.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Generate a fresh random identifier
    ///
    /// Used by stores that have no native id allocator (in-memory, seed files).
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..Self::LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BookId {
    fn from(value: String) -> Self {
        if Self::is_native(&value) {
            Self(value.to_ascii_lowercase())
        } else {
            Self(value)
        }
    }
}

impl From<BookId> for String {
    fn from(id: BookId) -> Self {
        id.0
    }
}

/// A book record as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id", deserialize_with = "stored_id")]
    pub id: BookId,

    #[serde(rename = "Title", default, deserialize_with = "text_or_empty")]
    pub title: String,

    /// Star rating, 0 to 5
    #[serde(rename = "Rating", default, deserialize_with = "integral")]
    pub rating: Option<i32>,

    /// Formatted price, e.g. `"£51.77"`
    #[serde(rename = "Price", default, deserialize_with = "text")]
    pub price: Option<String>,

    /// Stock text, e.g. `"In stock (19 available)"`
    #[serde(rename = "Availability", default, deserialize_with = "text")]
    pub availability: Option<String>,

    /// Every other stored attribute (UPC, taxes, thumbnail, ...), passed through
    /// untouched and in stored order
    #[serde(flatten)]
    pub attributes: IndexMap<String, Value>,
}

impl Book {
    /// Create a record with a generated id and no optional fields
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: BookId::generate(),
            title: title.into(),
            rating: None,
            price: None,
            availability: None,
            attributes: IndexMap::new(),
        }
    }

    pub fn with_id(mut self, id: BookId) -> Self {
        self.id = id;
        self
    }

    pub fn with_rating(mut self, rating: i32) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn with_availability(mut self, availability: impl Into<String>) -> Self {
        self.availability = Some(availability.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Numeric price derived from the formatted `Price` string
    pub fn price_numeric(&self) -> f64 {
        parse_price(self.price.as_deref())
    }

    /// Whether the availability text reports the book as in stock
    pub fn in_stock(&self) -> bool {
        is_in_stock(self.availability.as_deref())
    }

    /// Attach the derived view fields
    pub fn enrich(self) -> BookView {
        BookView {
            price_numeric: self.price_numeric(),
            in_stock: self.in_stock(),
            book: self,
        }
    }
}

fn stored_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BookId, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(BookId::from(id)),
        Value::Number(id) => Ok(BookId::from(id.to_string())),
        other => Err(serde::de::Error::custom(format!("unsupported _id value: {other}"))),
    }
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    text(deserializer).map(Option::unwrap_or_default)
}

/// Any JSON number with an integral value that fits an `i32`
fn integral<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let Value::Number(number) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    Ok(match number.as_i64() {
        Some(n) => i32::try_from(n).ok(),
        None => number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(f))
            .map(|f| f as i32),
    })
}

/// A book decorated with its derived display fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,

    #[serde(rename = "priceNumeric")]
    pub price_numeric: f64,

    #[serde(rename = "inStock")]
    pub in_stock: bool,
}

/// Parse a formatted price such as `"£51.77"` or `"$1,299.00"`
///
/// Currency symbols (`£`, `$`, `€`) and thousands separators are stripped, then
/// the longest leading decimal number is read. Absent, empty or non-numeric
/// input yields `0.0`.
pub fn parse_price(price: Option<&str>) -> f64 {
    let Some(price) = price else {
        return 0.0;
    };

    let cleaned = price.replace(['£', '$', '€', ','], "");
    leading_decimal(&cleaned).unwrap_or(0.0)
}

/// Whether an availability string reports stock (`"in stock"`, any case)
pub fn is_in_stock(availability: Option<&str>) -> bool {
    availability.is_some_and(|text| text.to_lowercase().contains("in stock"))
}

/// Read the longest decimal prefix of `text` (after leading whitespace)
fn leading_decimal(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if has_digits || frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }

    if !has_digits {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_price_pound() {
        assert_eq!(parse_price(Some("£51.77")), 51.77);
    }

    #[test]
    fn test_parse_price_empty_and_absent() {
        assert_eq!(parse_price(Some("")), 0.0);
        assert_eq!(parse_price(None), 0.0);
    }

    #[test]
    fn test_parse_price_strips_separators_and_symbols() {
        assert_eq!(parse_price(Some("$1,299.50")), 1299.5);
        assert_eq!(parse_price(Some("€ 12")), 12.0);
    }

    #[test]
    fn test_parse_price_reads_leading_number_only() {
        assert_eq!(parse_price(Some("£10.50 incl. tax")), 10.5);
        assert_eq!(parse_price(Some(".5")), 0.5);
    }

    #[test]
    fn test_parse_price_non_numeric_is_zero() {
        assert_eq!(parse_price(Some("free")), 0.0);
        assert_eq!(parse_price(Some("£")), 0.0);
    }

    #[test]
    fn test_parse_price_idempotent_on_numeric_form() {
        for raw in ["£51.77", "$0.99", "£1,000.01", ""] {
            let once = parse_price(Some(raw));
            let twice = parse_price(Some(&once.to_string()));
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_is_in_stock() {
        assert!(is_in_stock(Some("In stock (19 available)")));
        assert!(is_in_stock(Some("IN STOCK")));
        assert!(!is_in_stock(Some("Out of stock")));
        assert!(!is_in_stock(None));
    }

    #[test]
    fn test_book_id_parse() {
        let id = BookId::parse("65A1B2C3D4E5F60718293A4B").unwrap();
        assert_eq!(id.as_str(), "65a1b2c3d4e5f60718293a4b");

        assert!(BookId::parse("not-an-id").is_err());
        assert!(BookId::parse("65a1b2c3d4e5f60718293a4").is_err());
        assert!(BookId::parse("zza1b2c3d4e5f60718293a4b").is_err());
    }

    #[test]
    fn test_book_id_generate_is_valid() {
        let id = BookId::generate();
        assert!(BookId::parse(id.as_str()).is_ok());
        assert_ne!(id, BookId::generate());
    }

    #[test]
    fn test_book_deserialize_keeps_pass_through_attributes() {
        let book: Book = serde_json::from_value(json!({
            "_id": "65a1b2c3d4e5f60718293a4b",
            "Title": "A Light in the Attic",
            "Price": "£51.77",
            "Availability": "In stock",
            "Rating": 3,
            "Thumbnail URL": "https://example.org/a.jpg",
            "Page": 1
        }))
        .unwrap();

        assert_eq!(book.title, "A Light in the Attic");
        assert_eq!(book.rating, Some(3));
        assert_eq!(
            book.attributes.keys().collect::<Vec<_>>(),
            vec!["Thumbnail URL", "Page"]
        );
    }

    #[test]
    fn test_book_deserialize_tolerates_missing_fields() {
        let book: Book =
            serde_json::from_value(json!({"_id": "65a1b2c3d4e5f60718293a4b", "Rating": null}))
                .unwrap();
        assert_eq!(book.title, "");
        assert_eq!(book.rating, None);
        assert_eq!(book.price_numeric(), 0.0);
        assert!(!book.in_stock());
    }

    #[test]
    fn test_book_deserialize_null_title() {
        let book: Book = serde_json::from_value(json!({
            "_id": "65a1b2c3d4e5f60718293a4b",
            "Title": null,
            "Price": "£10.00"
        }))
        .unwrap();
        assert_eq!(book.title, "");
        assert_eq!(book.price_numeric(), 10.0);
    }

    #[test]
    fn test_book_deserialize_numeric_rating_types() {
        let rating = |value: Value| {
            serde_json::from_value::<Book>(json!({"_id": "b1", "Rating": value}))
                .unwrap()
                .rating
        };

        assert_eq!(rating(json!(4)), Some(4));
        assert_eq!(rating(json!(4.0)), Some(4));
        assert_eq!(rating(json!(4.5)), None);
        assert_eq!(rating(json!("4")), None);
        assert_eq!(rating(json!(1e12)), None);
    }

    #[test]
    fn test_book_deserialize_numeric_price() {
        let book: Book =
            serde_json::from_value(json!({"_id": "b1", "Price": 51.77, "Availability": 3}))
                .unwrap();
        assert_eq!(book.price.as_deref(), Some("51.77"));
        assert_eq!(book.price_numeric(), 51.77);
        assert!(!book.in_stock());
    }

    #[test]
    fn test_book_deserialize_opaque_ids() {
        let book: Book = serde_json::from_value(json!({"_id": "book-1"})).unwrap();
        assert_eq!(book.id.as_str(), "book-1");

        let book: Book = serde_json::from_value(json!({"_id": 42})).unwrap();
        assert_eq!(book.id.as_str(), "42");

        let book: Book =
            serde_json::from_value(json!({"_id": "65A1B2C3D4E5F60718293A4B"})).unwrap();
        assert_eq!(book.id, BookId::parse("65a1b2c3d4e5f60718293a4b").unwrap());

        assert!(serde_json::from_value::<Book>(json!({"_id": {"nested": 1}})).is_err());
    }

    #[test]
    fn test_enriched_view_serializes_flat() {
        let view = Book::new("Sharp Objects")
            .with_id(BookId::parse("65a1b2c3d4e5f60718293a4b").unwrap())
            .with_price("£47.82")
            .with_availability("In stock (20 available)")
            .with_rating(4)
            .with_attribute("UPC", json!("e00eb4fd7b871a48"))
            .enrich();

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["_id"], "65a1b2c3d4e5f60718293a4b");
        assert_eq!(value["Title"], "Sharp Objects");
        assert_eq!(value["Price"], "£47.82");
        assert_eq!(value["UPC"], "e00eb4fd7b871a48");
        assert_eq!(value["priceNumeric"], 47.82);
        assert_eq!(value["inStock"], true);
    }
}
