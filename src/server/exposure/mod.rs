//! API Exposure modules for different protocols
//!
//! Each exposure type consumes a `CatalogService` and produces a Router for
//! that protocol.

pub mod rest;

// Re-export for convenience
pub use rest::RestExposure;
