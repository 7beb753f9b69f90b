//! HTTP surface of the book catalog

pub mod handlers;

pub use handlers::{AppState, GetBookResponse, ListBooksResponse, get_book, list_books};
