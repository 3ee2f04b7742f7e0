//! Enrichment service trait

use crate::config::Credential;
use crate::core::types::{CategoryRef, ProductDetails};
use crate::utils::error::Result;

/// External calls made for every row
///
/// Each call is independent: a failure in one must not prevent the others.
/// Callers substitute deterministic defaults on error, so implementations
/// should fail fast rather than retry.
#[async_trait::async_trait]
pub trait EnrichmentService: Send + Sync {
    /// Translate the supplier name into the catalog language
    async fn translate_name(&self, credential: &Credential, name: &str) -> Result<String>;

    /// Produce a description, brand and unit of measure
    async fn generate_details(
        &self,
        credential: &Credential,
        name: &str,
        category: &CategoryRef,
    ) -> Result<ProductDetails>;

    /// Produce a product image and return where it can be fetched
    async fn generate_image(
        &self,
        credential: &Credential,
        name: &str,
        description: &str,
    ) -> Result<String>;

    /// Service name for logs
    fn name(&self) -> &str;
}
