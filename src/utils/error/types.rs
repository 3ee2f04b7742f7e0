//! Error types for the pipeline

use thiserror::Error;

/// Result type alias for the pipeline
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record or input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// External enrichment service errors
    #[error("Enrichment error: {0}")]
    Enrichment(String),

    /// Catalog store errors that are not raw database errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Category resolution errors
    #[error("Category error: {0}")]
    Category(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Cooperative cancellation was observed
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// The credential pool has nothing to hand out
    #[error("No credentials available: {0}")]
    NoCredentials(String),

    /// A worker gave up after repeated failures
    #[error("Worker failure: {0}")]
    WorkerFatal(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
