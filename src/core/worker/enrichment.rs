//! Per-row enrichment with deterministic fallbacks

use super::worker::Worker;
use crate::config::Credential;
use crate::core::types::{
    CategoryId, CategoryRef, DEFAULT_UNIT, EnrichedRecord, ProductDetails, QueuedRow,
};
use crate::utils::error::Result;
use std::future::Future;
use tracing::warn;

/// Name used when translation fails: the source name as written
pub fn fallback_name(source_name: &str) -> String {
    source_name.trim().to_string()
}

/// Details used when the description call fails
pub fn fallback_details(name: &str, category: &CategoryRef) -> ProductDetails {
    ProductDetails {
        description: format!("{} from our {} range.", name, category.name),
        brand: None,
        unit: None,
    }
}

/// Unit of measure, defaulting when missing or blank
pub fn resolve_unit(unit: Option<&str>) -> String {
    unit.map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(DEFAULT_UNIT)
        .to_string()
}

impl Worker {
    /// Run one external call, substituting `fallback` on any failure except
    /// cancellation
    async fn call_or<T, F, Fut>(
        &self,
        row: &QueuedRow,
        step: &'static str,
        call: F,
        fallback: impl FnOnce() -> T,
    ) -> Result<T>
    where
        F: FnOnce(Credential) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.ctx.pool.invoke(self.id, &self.cancel, call).await {
            Ok(value) => Ok(value),
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => {
                warn!(
                    worker_id = self.id,
                    row_index = row.row_index,
                    step,
                    error = %e,
                    "Enrichment call failed, using fallback"
                );
                Ok(fallback())
            }
        }
    }

    pub(super) async fn enrich(
        &self,
        row: &QueuedRow,
        category: &CategoryRef,
        category_id: CategoryId,
    ) -> Result<EnrichedRecord> {
        let service = &self.ctx.enrichment;
        let source_name = row.name();

        let translated = self
            .call_or(
                row,
                "translate_name",
                |cred| async move { service.translate_name(&cred, source_name).await },
                || fallback_name(source_name),
            )
            .await?;
        let name = if translated.trim().is_empty() {
            fallback_name(source_name)
        } else {
            translated.trim().to_string()
        };

        let details = self
            .call_or(
                row,
                "generate_details",
                |cred| {
                    let name = name.as_str();
                    async move { service.generate_details(&cred, name, category).await }
                },
                || fallback_details(&name, category),
            )
            .await?;
        let description = if details.description.trim().is_empty() {
            fallback_details(&name, category).description
        } else {
            details.description.trim().to_string()
        };

        let image_url = if self.ctx.settings.generate_images {
            self.call_or(
                row,
                "generate_image",
                |cred| {
                    let (name, description) = (name.as_str(), description.as_str());
                    async move {
                        service
                            .generate_image(&cred, name, description)
                            .await
                            .map(Some)
                    }
                },
                || None,
            )
            .await?
        } else {
            None
        };

        Ok(EnrichedRecord {
            code: row.code().to_string(),
            source_name: source_name.to_string(),
            unit: resolve_unit(details.unit.as_deref()),
            brand: details
                .brand
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty()),
            name,
            description,
            category_id,
            category_name: category.name.clone(),
            image_url,
            price: row.row.price,
            row_index: row.row_index,
            committed_at: None,
        })
    }
}
