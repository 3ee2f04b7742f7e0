//! Storage and enrichment endpoint validators

use super::trait_def::Validate;
use crate::config::models::{EnrichmentConfig, StorageConfig};

impl Validate for StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }

        let supported = ["sqlite:", "postgres://", "postgresql://"];
        if !supported.iter().any(|prefix| self.url.starts_with(prefix)) {
            return Err("Database URL must use sqlite: or postgres:// scheme".to_string());
        }

        if self.max_connections == 0 {
            return Err("Database max connections must be greater than 0".to_string());
        }

        if self.connection_timeout == 0 {
            return Err("Database connection timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for EnrichmentConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(format!(
                "api_base must use http:// or https:// scheme, got: {}",
                self.api_base
            ));
        }

        if self.text_model.trim().is_empty() {
            return Err("text model cannot be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
