//! Interrupted and restarted batches

use crate::common::{RowFactory, credentials, fast_config, single_category};
use catalog_enricher::core::ResumeLocator;
use catalog_enricher::core::types::{DEFAULT_UNIT, EnrichedRecord};
use catalog_enricher::services::OfflineEnrichment;
use catalog_enricher::storage::InMemoryCatalogStore;
use catalog_enricher::{Orchestrator, RunOptions};
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;

fn committed(code: &str, name: &str, row_index: usize, minutes_ago: i64) -> EnrichedRecord {
    EnrichedRecord {
        code: code.to_string(),
        source_name: name.to_string(),
        name: name.to_string(),
        description: String::new(),
        category_id: 1,
        category_name: "Tools".to_string(),
        brand: None,
        image_url: None,
        unit: DEFAULT_UNIT.to_string(),
        price: 10.0,
        row_index,
        committed_at: Some(Utc::now() - ChronoDuration::minutes(minutes_ago)),
    }
}

#[tokio::test]
async fn test_locator_uses_most_recent_commit() {
    let store = Arc::new(InMemoryCatalogStore::with_records([
        committed("P3", "Item 3", 3, 1),
        committed("P1", "Item 1", 1, 3),
        committed("P2", "Item 2", 2, 2),
    ]));

    let offset = crate::assert_ok!(
        ResumeLocator::new(store)
            .locate(&RowFactory::products(6))
            .await
    );
    assert_eq!(offset, 3);
}

#[tokio::test]
async fn test_locator_starts_over_for_unknown_name() {
    let store = Arc::new(InMemoryCatalogStore::with_records([committed(
        "X1",
        "Discontinued item",
        1,
        1,
    )]));

    let offset = crate::assert_ok!(
        ResumeLocator::new(store)
            .locate(&RowFactory::products(4))
            .await
    );
    assert_eq!(offset, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_run_continues_after_committed_rows() {
    let store = Arc::new(InMemoryCatalogStore::with_records([
        committed("P1", "Item 1", 1, 3),
        committed("P2", "Item 2", 2, 2),
        committed("P3", "Item 3", 3, 1),
    ]));
    let orchestrator = Orchestrator::new(
        fast_config(),
        credentials(2, 600),
        Arc::new(OfflineEnrichment::new()),
        store.clone(),
        single_category(10),
    );

    let report = orchestrator.run(&RowFactory::products(6)).await;

    assert!(report.success, "{}", report.message);
    assert_eq!(report.resumed_from, 3);
    assert_eq!(report.imported, 3);
    assert_eq!(report.performance.rows_processed, 3);
    assert_eq!(store.len(), 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_interrupted_batch_completes_on_restart() {
    let store = Arc::new(InMemoryCatalogStore::new());
    let orchestrator = Orchestrator::new(
        fast_config(),
        credentials(2, 600),
        Arc::new(OfflineEnrichment::new()),
        store.clone(),
        single_category(10),
    );
    let rows = RowFactory::products(10);

    // First run stops early, as if the process had been killed
    let first = orchestrator
        .run_with(
            &rows,
            RunOptions {
                max_workers: None,
                limit: Some(4),
            },
        )
        .await;
    assert_eq!(first.imported, 4);

    let second = orchestrator.run(&rows).await;
    assert!(second.success, "{}", second.message);
    assert!((1..=4).contains(&second.resumed_from));
    assert!(second.errors.is_empty());
    assert_eq!(first.imported + second.imported, 10);
    assert_eq!(store.len(), 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_out_of_order_commits_are_skipped() {
    // Row 5 was committed last, but rows 2 and 4 were left behind
    let store = Arc::new(InMemoryCatalogStore::with_records([
        committed("P1", "Item 1", 1, 5),
        committed("P3", "Item 3", 3, 4),
        committed("P5", "Item 5", 5, 1),
        committed("P7", "Item 7", 7, 9),
    ]));
    let orchestrator = Orchestrator::new(
        fast_config(),
        credentials(1, 600),
        Arc::new(OfflineEnrichment::new()),
        store.clone(),
        single_category(10),
    );

    let report = orchestrator.run(&RowFactory::products(8)).await;

    assert_eq!(report.resumed_from, 5);
    // Rows 6 and 8 are new; row 7 was already there
    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped, 1);
    assert!(store.get("P2").is_none());
    assert_eq!(store.len(), 6);
}
