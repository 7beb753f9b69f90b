//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "mongodb_backend")]
pub mod mongodb;

pub use in_memory::InMemoryBookStore;
#[cfg(feature = "mongodb_backend")]
pub use self::mongodb::MongoBookStore;

use crate::config::StoreConfig;
use crate::core::BookStore;
use anyhow::Result;
use std::sync::Arc;

/// Open the store described by the configuration
///
/// Called once at startup; the returned handle is shared by every request.
pub async fn open(config: &StoreConfig) -> Result<Arc<dyn BookStore>> {
    match config {
        StoreConfig::Memory { seed_file } => {
            let store = match seed_file {
                Some(path) => InMemoryBookStore::from_seed_file(path)?,
                None => InMemoryBookStore::new(),
            };
            tracing::info!(records = store.len()?, "Using in-memory book store");
            Ok(Arc::new(store))
        }
        #[cfg(feature = "mongodb_backend")]
        StoreConfig::Mongodb {
            uri,
            database,
            collection,
        } => Ok(Arc::new(
            MongoBookStore::connect(uri, database, collection).await?,
        )),
        #[cfg(not(feature = "mongodb_backend"))]
        StoreConfig::Mongodb { .. } => Err(anyhow::anyhow!(
            "MongoDB store configured but this build lacks the `mongodb_backend` feature"
        )),
    }
}
