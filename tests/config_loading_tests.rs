//! Integration tests for configuration files and store bootstrap

use catalog::config::ConfigError;
use catalog::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_yaml_file() {
    let file = write_temp(
        r#"
server:
  host: 127.0.0.1
  port: 8081
pagination:
  default_limit: 12
  max_limit: 48
store:
  backend: mongodb
  uri: mongodb://catalog-db:27017
  database: shop
"#,
    );

    let config = CatalogConfig::from_yaml_file(file.path()).unwrap();

    assert_eq!(config.server.bind_addr(), "127.0.0.1:8081");
    assert_eq!(
        config.pagination,
        PaginationConfig {
            default_limit: 12,
            max_limit: Some(48)
        }
    );
    assert_eq!(
        config.store,
        StoreConfig::Mongodb {
            uri: "mongodb://catalog-db:27017".to_string(),
            database: "shop".to_string(),
            collection: "books".to_string(),
        }
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_file_is_read_error() {
    let err = CatalogConfig::from_yaml_file("/nonexistent/catalog.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn test_unknown_backend_is_parse_error() {
    let err = CatalogConfig::from_yaml_str("store:\n  backend: postgres\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[tokio::test]
async fn test_memory_backend_serves_seed_file() {
    let seed = write_temp(
        r#"[
            {"Title": "Tipping the Velvet", "Price": "£53.74", "Availability": "In stock", "Rating": 1},
            {"Title": "Soumission", "Price": "£50.10", "Availability": "In stock", "Rating": 1}
        ]"#,
    );
    let config = CatalogConfig::from_yaml_str(&format!(
        "store:\n  backend: memory\n  seed_file: {}\n",
        seed.path().display()
    ))
    .unwrap();

    let store = catalog::storage::open(&config.store).await.unwrap();
    let service = CatalogService::new(store, config.pagination);

    let listing = service
        .list_books(&BookQueryParams {
            max_price: Some("51".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(listing.page.pagination.total_books, 1);
    assert_eq!(listing.page.items[0].book.title, "Soumission");

    let view = service.get_book("velvet").await.unwrap();
    assert_eq!(view.price_numeric, 53.74);
}
