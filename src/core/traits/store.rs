//! Catalog store trait

use crate::core::types::{CategoryId, CategoryRef, CommitOutcome, EnrichedRecord};
use crate::utils::error::Result;

/// Persistent catalog the pipeline writes into
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Most recently committed record by commit time, if any
    async fn find_most_recent_committed(&self) -> Result<Option<EnrichedRecord>>;

    /// Whether a record with this product code is already committed
    async fn is_committed(&self, code: &str) -> Result<bool>;

    /// Persist a record. Committing a code that already exists is not an
    /// error; it reports `AlreadyPresent` and writes nothing.
    async fn commit(&self, record: &EnrichedRecord) -> Result<CommitOutcome>;

    /// Return the id of the category, creating it (and its parent) if needed
    async fn ensure_category_exists(&self, category: &CategoryRef) -> Result<CategoryId>;
}
