//! Server module for building the catalog HTTP server
//!
//! This module provides a `ServerBuilder` that wires a `BookStore` into the
//! REST routes:
//! - Book listing and lookup routes
//! - Health check routes

pub mod builder;
pub mod exposure;
pub mod router;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
