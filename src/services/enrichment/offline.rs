//! Enrichment that never reaches a network

use crate::config::Credential;
use crate::core::traits::EnrichmentService;
use crate::core::types::{CategoryRef, ProductDetails};
use crate::utils::error::{PipelineError, Result};

/// Fails every call so workers fall back to their deterministic defaults
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineEnrichment;

impl OfflineEnrichment {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl EnrichmentService for OfflineEnrichment {
    async fn translate_name(&self, _credential: &Credential, _name: &str) -> Result<String> {
        Err(PipelineError::enrichment("offline mode"))
    }

    async fn generate_details(
        &self,
        _credential: &Credential,
        _name: &str,
        _category: &CategoryRef,
    ) -> Result<ProductDetails> {
        Err(PipelineError::enrichment("offline mode"))
    }

    async fn generate_image(
        &self,
        _credential: &Credential,
        _name: &str,
        _description: &str,
    ) -> Result<String> {
        Err(PipelineError::enrichment("offline mode"))
    }

    fn name(&self) -> &str {
        "offline"
    }
}
