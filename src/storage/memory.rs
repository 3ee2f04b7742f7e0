//! In-memory catalog store
//!
//! Same contract as the database store, without persistence. Used for dry runs
//! and tests.

use crate::core::traits::CatalogStore;
use crate::core::types::{CategoryId, CategoryRef, CommitOutcome, EnrichedRecord};
use crate::utils::error::Result;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
struct Catalog {
    records: Vec<EnrichedRecord>,
    codes: HashMap<String, usize>,
    categories: HashMap<(String, Option<CategoryId>), CategoryId>,
    next_category_id: CategoryId,
}

/// Catalog held in process memory
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    inner: RwLock<Catalog>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with already committed records
    pub fn with_records(records: impl IntoIterator<Item = EnrichedRecord>) -> Self {
        let store = Self::new();
        {
            let mut catalog = store.inner.write();
            for mut record in records {
                record.committed_at.get_or_insert_with(Utc::now);
                let position = catalog.records.len();
                catalog.codes.insert(record.code.clone(), position);
                catalog.records.push(record);
            }
        }
        store
    }

    /// Committed records in commit order
    pub fn records(&self) -> Vec<EnrichedRecord> {
        self.inner.read().records.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn category_count(&self) -> usize {
        self.inner.read().categories.len()
    }

    pub fn get(&self, code: &str) -> Option<EnrichedRecord> {
        let catalog = self.inner.read();
        catalog
            .codes
            .get(code)
            .and_then(|&i| catalog.records.get(i))
            .cloned()
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn find_most_recent_committed(&self) -> Result<Option<EnrichedRecord>> {
        let catalog = self.inner.read();
        Ok(catalog
            .records
            .iter()
            .enumerate()
            .max_by_key(|(i, r)| (r.committed_at, *i))
            .map(|(_, r)| r.clone()))
    }

    async fn is_committed(&self, code: &str) -> Result<bool> {
        Ok(self.inner.read().codes.contains_key(code))
    }

    async fn commit(&self, record: &EnrichedRecord) -> Result<CommitOutcome> {
        let mut catalog = self.inner.write();
        if catalog.codes.contains_key(&record.code) {
            return Ok(CommitOutcome::AlreadyPresent);
        }

        let mut stored = record.clone();
        stored.committed_at = Some(Utc::now());
        let position = catalog.records.len();
        catalog.codes.insert(stored.code.clone(), position);
        catalog.records.push(stored);

        debug!(code = %record.code, row_index = record.row_index, "record committed");
        Ok(CommitOutcome::Inserted)
    }

    async fn ensure_category_exists(&self, category: &CategoryRef) -> Result<CategoryId> {
        let mut catalog = self.inner.write();

        let parent_id = match &category.parent {
            Some(parent) => Some(upsert_category(&mut catalog, parent, None)),
            None => None,
        };
        Ok(upsert_category(&mut catalog, &category.name, parent_id))
    }
}

fn upsert_category(catalog: &mut Catalog, name: &str, parent: Option<CategoryId>) -> CategoryId {
    let key = (name.to_string(), parent);
    if let Some(&id) = catalog.categories.get(&key) {
        return id;
    }
    catalog.next_category_id += 1;
    let id = catalog.next_category_id;
    catalog.categories.insert(key, id);
    id
}
