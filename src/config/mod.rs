//! Configuration management for the pipeline
//!
//! This module handles loading and validation of the batch configuration:
//! worker pool sizing, rate limits, credentials, the enrichment endpoint,
//! storage and the category table.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::core::types::CategoryRange;
use crate::utils::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Environment variable holding comma-separated API keys
pub const ENV_API_KEYS: &str = "CATALOG_API_KEYS";
/// Environment variable holding the per-key budget for `CATALOG_API_KEYS`
pub const ENV_KEY_RPM: &str = "CATALOG_KEY_RPM";
/// Environment variable overriding the storage URL
pub const ENV_DATABASE_URL: &str = "CATALOG_DATABASE_URL";
/// Environment variable overriding the enrichment base URL
pub const ENV_API_BASE: &str = "CATALOG_API_BASE";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub credentials: Vec<Credential>,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Row-index ranges mapped to categories
    #[serde(default)]
    pub categories: Vec<CategoryRange>,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PipelineError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?.with_env_overrides();
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse configuration from a YAML string without validating it
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| PipelineError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self::default().with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `CATALOG_*` environment overrides on top of this configuration
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(keys) = std::env::var(ENV_API_KEYS) {
            let rpm = std::env::var(ENV_KEY_RPM)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or_else(default_key_rpm);
            let credentials = credentials_from_keys(&keys, rpm);
            if !credentials.is_empty() {
                debug!(count = credentials.len(), "Using credentials from environment");
                self.credentials = credentials;
            }
        }
        if let Ok(url) = std::env::var(ENV_DATABASE_URL) {
            self.storage.url = url;
        }
        if let Ok(base) = std::env::var(ENV_API_BASE) {
            self.enrichment.api_base = base;
        }
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        Validate::validate(self).map_err(PipelineError::Config)?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            PipelineError::Config(format!("Failed to serialize config to YAML: {}", e))
        })
    }
}
