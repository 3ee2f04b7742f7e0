//! Root configuration validator

use super::category_validators::validate_category_ranges;
use super::credential_validators::validate_credentials;
use super::trait_def::Validate;
use crate::config::Config;
use tracing::debug;

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating catalog configuration");

        self.pipeline
            .validate()
            .map_err(|e| format!("pipeline: {}", e))?;
        self.rate_limit
            .validate()
            .map_err(|e| format!("rate_limit: {}", e))?;
        validate_credentials(&self.credentials).map_err(|e| format!("credentials: {}", e))?;
        self.enrichment
            .validate()
            .map_err(|e| format!("enrichment: {}", e))?;
        self.storage
            .validate()
            .map_err(|e| format!("storage: {}", e))?;
        validate_category_ranges(&self.categories).map_err(|e| format!("categories: {}", e))?;

        Ok(())
    }
}
