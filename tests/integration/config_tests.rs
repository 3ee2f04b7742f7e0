//! Configuration loading and validation

use catalog_enricher::config::{Config, RateLimitStrategy};
use catalog_enricher::core::types::{CategoryTable, load_rows};
use catalog_enricher::core::traits::CategoryLookup;
use catalog_enricher::{OrchestratorConfig, PipelineError};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
pipeline:
  worker_timeout_secs: 120
  max_consecutive_failures: 3
  generate_images: false
rate_limit:
  strategy: fixed_window
  window_secs: 30
credentials:
  - id: primary
    rpm: 60
    api_key: sk-test-1
  - id: backup
    requests_per_minute: 15
enrichment:
  api_base: "https://api.example.test/v1"
storage:
  url: "sqlite::memory:"
categories:
  - { start: 2, end: 10, name: "Drills", parent: "Hardware" }
  - { start: 12, end: 30, name: "Saws", parent: "Hardware" }
"#;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[tokio::test]
async fn test_full_config_file() {
    let file = write_temp(CONFIG);
    let config = crate::assert_ok!(Config::from_file(file.path()).await);

    assert_eq!(config.credentials.len(), 2);
    assert_eq!(config.credentials[0].requests_per_minute, 60);
    assert_eq!(config.credentials[0].api_key.as_deref(), Some("sk-test-1"));
    assert_eq!(config.rate_limit.strategy, RateLimitStrategy::FixedWindow);

    let orchestrator_config = OrchestratorConfig::from_config(&config);
    assert_eq!(orchestrator_config.worker_timeout, Duration::from_secs(120));
    assert_eq!(orchestrator_config.rate_window, Duration::from_secs(30));
    assert!(!orchestrator_config.pipeline.generate_images);

    let table = CategoryTable::new(config.categories.clone());
    assert!(table.category_for_index(1).is_none());
    let saws = table.category_for_index(12).expect("row 12 has a category");
    assert_eq!(saws.name, "Saws");
    assert_eq!(saws.parent.as_deref(), Some("Hardware"));
}

#[tokio::test]
async fn test_overlapping_categories_rejected() {
    let yaml = r#"
credentials:
  - id: primary
categories:
  - { start: 1, end: 10, name: "Drills" }
  - { start: 10, end: 20, name: "Saws" }
"#;
    let file = write_temp(yaml);
    let err = crate::assert_err!(Config::from_file(file.path()).await);
    assert!(matches!(err, PipelineError::Config(_)));
    assert!(err.to_string().contains("overlap"));
}

#[tokio::test]
async fn test_duplicate_credentials_rejected() {
    let yaml = r#"
credentials:
  - id: primary
  - id: primary
"#;
    let file = write_temp(yaml);
    let err = crate::assert_err!(Config::from_file(file.path()).await);
    assert!(err.to_string().contains("duplicate credential id"));
}

#[tokio::test]
async fn test_unsupported_database_rejected() {
    let yaml = r#"
credentials:
  - id: primary
storage:
  url: "mysql://localhost/catalog"
"#;
    let file = write_temp(yaml);
    let err = crate::assert_err!(Config::from_file(file.path()).await);
    assert!(err.to_string().contains("storage"));
}

#[tokio::test]
async fn test_rows_file() {
    let file = write_temp(
        r#"[
            {"code": "A", "name": "Widget", "price": 100},
            {"code": "", "name": "Cleaning"},
            {"code": "B", "name": "Gadget", "price": 50.5}
        ]"#,
    );

    let rows = crate::assert_ok!(load_rows(file.path()).await);
    assert_eq!(rows.len(), 3);
    assert!(rows[1].is_category_header());
    assert_eq!(rows[2].price, 50.5);
}
