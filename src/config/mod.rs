//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file (path in `CATALOG_CONFIG`)
//! and is then overridden by environment variables, which may also be set in a
//! `.env` file:
//!
//! | variable | overrides |
//! |---|---|
//! | `HOST` | `server.host` |
//! | `PORT` | `server.port` |
//! | `MONGODB_URI` | `store.uri` (mongodb backend) |
//! | `DATABASE_NAME` | `store.database` (mongodb backend) |
//! | `COLLECTION_NAME` | `store.collection` (mongodb backend) |
//! | `CATALOG_SEED_FILE` | `store.seed_file` (memory backend) |

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the YAML configuration file
pub const CONFIG_PATH_VAR: &str = "CATALOG_CONFIG";

/// Errors raised while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Page size settings for the listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size used when the request does not specify a valid one
    pub default_limit: usize,

    /// Largest page size a request may ask for; unset means no cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_limit: Option<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: None,
        }
    }
}

/// Which record store backs the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// A MongoDB collection
    Mongodb {
        #[serde(default = "default_mongodb_uri")]
        uri: String,
        #[serde(default = "default_database")]
        database: String,
        #[serde(default = "default_collection")]
        collection: String,
    },

    /// An in-memory store, optionally seeded from a JSON file
    Memory {
        #[serde(default)]
        seed_file: Option<PathBuf>,
    },
}

fn default_mongodb_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_database() -> String {
    "books_scraper".to_string()
}

fn default_collection() -> String {
    "books".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Mongodb {
            uri: default_mongodb_uri(),
            database: default_database(),
            collection: default_collection(),
        }
    }
}

/// Complete configuration of the catalog server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub server: ServerConfig,
    pub pagination: PaginationConfig,
    pub store: StoreConfig,
}

impl CatalogConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path, source })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load the process configuration
    ///
    /// Reads `.env` if present, then the YAML file named by `CATALOG_CONFIG`
    /// (defaults when unset), applies environment overrides and validates.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }

        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_yaml_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "PORT",
                value: port.clone(),
            })?;
        }

        match &mut self.store {
            StoreConfig::Mongodb {
                uri,
                database,
                collection,
            } => {
                if let Some(value) = lookup("MONGODB_URI") {
                    *uri = value;
                }
                if let Some(value) = lookup("DATABASE_NAME") {
                    *database = value;
                }
                if let Some(value) = lookup("COLLECTION_NAME") {
                    *collection = value;
                }
            }
            StoreConfig::Memory { seed_file } => {
                if let Some(value) = lookup("CATALOG_SEED_FILE") {
                    *seed_file = Some(PathBuf::from(value));
                }
            }
        }

        Ok(())
    }

    /// Check that the configuration can be served
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".into()));
        }
        if self.pagination.default_limit == 0 {
            return Err(ConfigError::Invalid(
                "pagination.default_limit must be at least 1".into(),
            ));
        }
        if self
            .pagination
            .max_limit
            .is_some_and(|max| max < self.pagination.default_limit)
        {
            return Err(ConfigError::Invalid(
                "pagination.max_limit must not be below pagination.default_limit".into(),
            ));
        }
        if let StoreConfig::Mongodb {
            database,
            collection,
            ..
        } = &self.store
        {
            if database.trim().is_empty() || collection.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "store.database and store.collection must not be empty".into(),
                ));
            }
        }
        Ok(())
    }
}
