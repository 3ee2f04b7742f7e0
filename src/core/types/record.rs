//! Enriched catalog records

use super::category::CategoryId;
use crate::utils::error::{PipelineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit of measure used when enrichment cannot supply one
pub const DEFAULT_UNIT: &str = "pcs";

/// Product fields produced by the description call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub description: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

/// A catalog record derived from one raw row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    /// Supplier product code, unique across the catalog
    pub code: String,
    /// Name exactly as it appeared in the input; used to resume batches
    pub source_name: String,
    /// Translated display name
    pub name: String,
    pub description: String,
    pub category_id: CategoryId,
    pub category_name: String,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub unit: String,
    pub price: f64,
    /// 1-based position in the input the record was built from
    pub row_index: usize,
    /// Set by the store on commit
    pub committed_at: Option<DateTime<Utc>>,
}

impl EnrichedRecord {
    /// Reject records the store must never see
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(PipelineError::validation("product code is empty"));
        }
        if self.name.trim().is_empty() {
            return Err(PipelineError::validation("product name is empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(PipelineError::validation(format!(
                "invalid price {}",
                self.price
            )));
        }
        if self.unit.trim().is_empty() {
            return Err(PipelineError::validation("unit of measure is empty"));
        }
        Ok(())
    }
}

/// What a commit did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new record was written
    Inserted,
    /// A record with the same code already exists; nothing was written
    AlreadyPresent,
}
