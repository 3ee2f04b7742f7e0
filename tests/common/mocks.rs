//! Scripted collaborators
//!
//! `RecordingEnrichment` answers every call and logs which credential made it
//! and when. `FlakyStore` wraps the in-memory catalog, refuses commits for
//! chosen product codes and can hold chosen commits for a while.

use async_trait::async_trait;
use catalog_enricher::config::Credential;
use catalog_enricher::core::traits::{CatalogStore, EnrichmentService};
use catalog_enricher::core::types::{
    CategoryId, CategoryRef, CommitOutcome, EnrichedRecord, ProductDetails,
};
use catalog_enricher::storage::InMemoryCatalogStore;
use catalog_enricher::{PipelineError, Result};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Enrichment that succeeds deterministically and records call times
#[derive(Default)]
pub struct RecordingEnrichment {
    calls: Mutex<BTreeMap<String, Vec<Instant>>>,
    latency: Duration,
}

impl RecordingEnrichment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every call
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// Call instants per credential id
    pub fn calls(&self) -> BTreeMap<String, Vec<Instant>> {
        self.calls.lock().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().map(Vec::len).sum()
    }

    async fn record(&self, credential: &Credential) {
        self.calls
            .lock()
            .entry(credential.id.clone())
            .or_default()
            .push(Instant::now());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl EnrichmentService for RecordingEnrichment {
    async fn translate_name(&self, credential: &Credential, name: &str) -> Result<String> {
        self.record(credential).await;
        Ok(format!("{} (translated)", name))
    }

    async fn generate_details(
        &self,
        credential: &Credential,
        name: &str,
        category: &CategoryRef,
    ) -> Result<ProductDetails> {
        self.record(credential).await;
        Ok(ProductDetails {
            description: format!("{} for {}", name, category.name),
            brand: Some("Acme".to_string()),
            unit: Some("box".to_string()),
        })
    }

    async fn generate_image(
        &self,
        credential: &Credential,
        _name: &str,
        _description: &str,
    ) -> Result<String> {
        self.record(credential).await;
        Ok("https://images.test/item.png".to_string())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Largest number of instants that fall inside any span of `window`
pub fn max_in_window(instants: &[Instant], window: Duration) -> usize {
    let mut sorted = instants.to_vec();
    sorted.sort();
    let mut best = 0;
    let mut start = 0;
    for end in 0..sorted.len() {
        while sorted[end].duration_since(sorted[start]) >= window {
            start += 1;
        }
        best = best.max(end - start + 1);
    }
    best
}

/// In-memory catalog that fails commits for selected codes
pub struct FlakyStore {
    inner: Arc<InMemoryCatalogStore>,
    failing: HashSet<String>,
    passing: HashSet<String>,
    slow: HashMap<String, Duration>,
    latency: Duration,
}

impl FlakyStore {
    pub fn new(inner: Arc<InMemoryCatalogStore>, failing: &[&str]) -> Self {
        Self {
            inner,
            failing: failing.iter().map(|c| c.to_string()).collect(),
            passing: HashSet::new(),
            slow: HashMap::new(),
            latency: Duration::ZERO,
        }
    }

    /// Store whose every commit fails
    pub fn always_failing(inner: Arc<InMemoryCatalogStore>) -> Self {
        Self::new(inner, &["*"])
    }

    /// Store where only the listed codes can be committed
    pub fn failing_except(inner: Arc<InMemoryCatalogStore>, passing: &[&str]) -> Self {
        Self {
            passing: passing.iter().map(|c| c.to_string()).collect(),
            ..Self::always_failing(inner)
        }
    }

    /// Hold the commit of `code` for `delay` before writing it
    pub fn with_slow_commit(mut self, code: &str, delay: Duration) -> Self {
        self.slow.insert(code.to_string(), delay);
        self
    }

    /// Hold every other commit for `latency`
    pub fn with_commit_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn fails(&self, code: &str) -> bool {
        if self.passing.contains(code) {
            return false;
        }
        self.failing.contains("*") || self.failing.contains(code)
    }
}

#[async_trait]
impl CatalogStore for FlakyStore {
    async fn find_most_recent_committed(&self) -> Result<Option<EnrichedRecord>> {
        self.inner.find_most_recent_committed().await
    }

    async fn is_committed(&self, code: &str) -> Result<bool> {
        self.inner.is_committed(code).await
    }

    async fn commit(&self, record: &EnrichedRecord) -> Result<CommitOutcome> {
        let delay = self.slow.get(&record.code).copied().unwrap_or(self.latency);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fails(&record.code) {
            return Err(PipelineError::storage("disk full"));
        }
        self.inner.commit(record).await
    }

    async fn ensure_category_exists(&self, category: &CategoryRef) -> Result<CategoryId> {
        self.inner.ensure_category_exists(category).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_in_window() {
        let base = Instant::now();
        let at = |ms| base + Duration::from_millis(ms);
        let instants = [at(0), at(10), at(20), at(120), at(130)];
        assert_eq!(max_in_window(&instants, Duration::from_millis(100)), 3);
        assert_eq!(max_in_window(&instants, Duration::from_millis(5)), 1);
        assert_eq!(max_in_window(&[], Duration::from_millis(5)), 0);
    }
}
