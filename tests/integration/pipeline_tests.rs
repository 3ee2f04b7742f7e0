//! Whole-batch pipeline tests

use crate::common::mocks::max_in_window;
use crate::common::{
    FlakyStore, RecordingEnrichment, RowFactory, credentials, fast_config, single_category,
};
use catalog_enricher::config::PipelineConfig;
use catalog_enricher::core::types::{CategoryRange, CategoryTable};
use catalog_enricher::core::worker::WorkerState;
use catalog_enricher::services::OfflineEnrichment;
use catalog_enricher::storage::InMemoryCatalogStore;
use catalog_enricher::{Orchestrator, OrchestratorConfig, RunOptions};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_header_rows_are_not_products() {
    let rows = vec![
        RowFactory::product("A", "Widget", 100.0),
        RowFactory::header("Cleaning"),
        RowFactory::product("B", "Gadget", 50.0),
    ];
    let categories = Arc::new(CategoryTable::new(vec![
        CategoryRange {
            start: 1,
            end: 1,
            name: "Tools".to_string(),
            parent: None,
        },
        CategoryRange {
            start: 3,
            end: 3,
            name: "Gadgets".to_string(),
            parent: None,
        },
    ]));
    let store = Arc::new(InMemoryCatalogStore::new());
    let orchestrator = Orchestrator::new(
        fast_config(),
        credentials(1, 60),
        Arc::new(OfflineEnrichment::new()),
        store.clone(),
        categories,
    );

    let report = orchestrator.run(&rows).await;

    assert!(report.success, "{}", report.message);
    assert_eq!(report.imported, 2);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert_eq!(store.len(), 2);

    let widget = store.get("A").expect("A committed");
    assert_eq!(widget.category_name, "Tools");
    assert_eq!(widget.row_index, 1);
    assert_eq!(widget.name, "Widget");
    assert_eq!(widget.description, "Widget from our Tools range.");
    assert_eq!(widget.unit, "pcs");

    let gadget = store.get("B").expect("B committed");
    assert_eq!(gadget.category_name, "Gadgets");
    assert_eq!(gadget.row_index, 3);
    assert_eq!(gadget.price, 50.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_enriched_fields_reach_the_store() {
    let store = Arc::new(InMemoryCatalogStore::new());
    let enrichment = Arc::new(RecordingEnrichment::new());
    let orchestrator = Orchestrator::new(
        fast_config(),
        credentials(2, 600),
        enrichment.clone(),
        store.clone(),
        single_category(10),
    );

    let report = orchestrator.run(&RowFactory::products(4)).await;

    assert!(report.success, "{}", report.message);
    assert_eq!(report.imported, 4);
    // Images are disabled in the fast config: two calls per row
    assert_eq!(enrichment.total_calls(), 8);

    let record = store.get("P2").expect("P2 committed");
    assert_eq!(record.name, "Item 2 (translated)");
    assert_eq!(record.source_name, "Item 2");
    assert_eq!(record.brand.as_deref(), Some("Acme"));
    assert_eq!(record.unit, "box");
    assert!(record.image_url.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_row_failure_is_isolated() {
    let inner = Arc::new(InMemoryCatalogStore::new());
    let store = Arc::new(FlakyStore::new(inner.clone(), &["P5"]));
    let orchestrator = Orchestrator::new(
        fast_config(),
        credentials(2, 600),
        Arc::new(OfflineEnrichment::new()),
        store,
        single_category(10),
    );

    let report = orchestrator.run(&RowFactory::products(10)).await;

    assert!(report.success, "{}", report.message);
    assert_eq!(report.imported, 9);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("row 5 'Item 5'"), "{}", report.errors[0]);
    assert!(report.errors[0].contains("disk full"));

    assert!(inner.get("P5").is_none());
    for code in ["P1", "P2", "P3", "P4", "P6", "P7", "P8", "P9", "P10"] {
        assert!(inner.get(code).is_some(), "{} missing", code);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_circuit_breaker_fails_batch() {
    let inner = Arc::new(InMemoryCatalogStore::new());
    let store = Arc::new(FlakyStore::always_failing(inner.clone()));
    let pipeline = PipelineConfig {
        max_consecutive_failures: 2,
        generate_images: false,
        ..PipelineConfig::default()
    };
    let config = OrchestratorConfig::new(pipeline, Default::default())
        .with_progress_interval(Duration::from_millis(20));
    let orchestrator = Orchestrator::new(
        config,
        credentials(2, 600),
        Arc::new(OfflineEnrichment::new()),
        store,
        single_category(40),
    );

    let report = orchestrator.run(&RowFactory::products(40)).await;

    assert!(!report.success);
    assert_eq!(report.imported, 0);
    assert!(inner.is_empty());
    assert!(report.message.contains("Circuit breaker opened"), "{}", report.message);
    let breaker = report
        .performance
        .circuit_breaker
        .expect("breaker metrics reported");
    assert!(breaker.fatal * 2 > report.performance.worker_count);
    assert!(report.errors.iter().any(|e| e.contains("fatal")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_circuit_breaker_cancels_healthy_worker() {
    let inner = Arc::new(InMemoryCatalogStore::new());
    // Only P3 can be committed and its commit outlasts the failing ones
    let store = Arc::new(
        FlakyStore::failing_except(inner.clone(), &["P3"])
            .with_slow_commit("P3", Duration::from_millis(500))
            .with_commit_latency(Duration::from_millis(100)),
    );
    let pipeline = PipelineConfig {
        max_consecutive_failures: 1,
        generate_images: false,
        ..PipelineConfig::default()
    };
    let config = OrchestratorConfig::new(pipeline, Default::default())
        .with_progress_interval(Duration::from_millis(20));
    let orchestrator = Orchestrator::new(
        config,
        credentials(3, 600),
        Arc::new(OfflineEnrichment::new()),
        store,
        single_category(60),
    );

    let started = Instant::now();
    let report = orchestrator
        .run_with(
            &RowFactory::products(60),
            RunOptions {
                max_workers: Some(3),
                limit: None,
            },
        )
        .await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(!report.success);
    assert!(report.message.starts_with("Circuit breaker opened"), "{}", report.message);
    assert_eq!(report.performance.worker_count, 3);

    let workers = &report.performance.workers;
    let fatal = workers.iter().filter(|w| w.outcome.starts_with("fatal")).count();
    let cancelled: Vec<_> = workers.iter().filter(|w| w.outcome == "cancelled").collect();
    assert_eq!(fatal, 2);
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].state, WorkerState::Cancelled);
    // The healthy worker finished its commit, then stopped
    assert_eq!(cancelled[0].imported, 1);

    assert_eq!(report.imported, 1);
    assert_eq!(inner.len(), 1);
    assert!(inner.get("P3").is_some());
    // Most of the input was never touched
    assert!(report.performance.rows_processed <= 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_commit_finishing_after_timeout_counts_as_imported() {
    let inner = Arc::new(InMemoryCatalogStore::new());
    let store = Arc::new(
        FlakyStore::new(inner.clone(), &[]).with_slow_commit("P2", Duration::from_millis(400)),
    );
    let config = fast_config().with_worker_timeout(Duration::from_millis(150));
    let orchestrator = Orchestrator::new(
        config,
        credentials(1, 600),
        Arc::new(OfflineEnrichment::new()),
        store,
        single_category(10),
    );

    let report = orchestrator
        .run_with(
            &RowFactory::products(3),
            RunOptions {
                max_workers: Some(1),
                limit: None,
            },
        )
        .await;

    assert!(!report.success);
    assert!(report.errors.iter().any(|e| e == "worker 0: timed out"));
    // P2 was persisted after the worker was dropped
    assert!(inner.get("P2").is_some());
    assert_eq!(report.imported, 2);
    assert!(report.errors.iter().all(|e| !e.contains("row 2")), "{:?}", report.errors);

    let worker = &report.performance.workers[0];
    assert_eq!(worker.outcome, "timed out");
    assert_eq!(worker.processed, 2);
    assert_eq!(report.performance.rows_processed, 2);
    assert!(inner.get("P3").is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rerun_commits_nothing_twice() {
    let store = Arc::new(InMemoryCatalogStore::new());
    let orchestrator = Orchestrator::new(
        fast_config(),
        credentials(2, 600),
        Arc::new(OfflineEnrichment::new()),
        store.clone(),
        single_category(12),
    );
    let rows = RowFactory::products(12);

    let first = orchestrator.run(&rows).await;
    assert!(first.success, "{}", first.message);
    assert_eq!(first.imported, 12);

    let second = orchestrator.run(&rows).await;
    assert!(second.success, "{}", second.message);
    assert_eq!(second.imported, 0);
    assert!(second.errors.is_empty());
    assert_eq!(store.len(), 12);
    assert_ne!(first.batch_id, second.batch_id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rate_budget_is_never_exceeded() {
    const BUDGET: u32 = 3;
    let window = Duration::from_millis(250);

    let pipeline = PipelineConfig {
        per_worker_rpm: 1,
        max_workers_per_credential: 2,
        generate_images: false,
        ..PipelineConfig::default()
    };
    let config = OrchestratorConfig::new(pipeline, Default::default())
        .with_rate_window(window)
        .with_progress_interval(Duration::from_millis(20));
    let enrichment = Arc::new(RecordingEnrichment::new());
    let orchestrator = Orchestrator::new(
        config,
        credentials(2, BUDGET),
        enrichment.clone(),
        Arc::new(InMemoryCatalogStore::new()),
        single_category(8),
    );

    let report = orchestrator.run(&RowFactory::products(8)).await;

    assert!(report.success, "{}", report.message);
    assert_eq!(report.imported, 8);
    assert_eq!(report.performance.worker_count, 4);

    let calls = enrichment.calls();
    assert_eq!(calls.len(), 2);
    // Instants are taken after the limiter admits a call, so allow for jitter
    let observed = window - Duration::from_millis(30);
    for (credential, instants) in calls {
        let peak = max_in_window(&instants, observed);
        assert!(
            peak <= BUDGET as usize,
            "{} issued {} calls within {:?}",
            credential,
            peak,
            observed
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_worker_cap_and_limit() {
    let store = Arc::new(InMemoryCatalogStore::new());
    let orchestrator = Orchestrator::new(
        fast_config(),
        credentials(3, 600),
        Arc::new(OfflineEnrichment::new()),
        store.clone(),
        single_category(20),
    );

    let report = orchestrator
        .run_with(
            &RowFactory::products(20),
            RunOptions {
                max_workers: Some(1),
                limit: Some(5),
            },
        )
        .await;

    assert!(report.success, "{}", report.message);
    assert_eq!(report.performance.worker_count, 1);
    assert_eq!(report.imported, 5);
    assert_eq!(store.len(), 5);
    assert_eq!(
        report.performance.workers[0].state,
        WorkerState::Completed
    );
}

#[tokio::test]
async fn test_empty_input_is_successful() {
    let orchestrator = Orchestrator::new(
        fast_config(),
        credentials(1, 60),
        Arc::new(OfflineEnrichment::new()),
        Arc::new(InMemoryCatalogStore::new()),
        single_category(1),
    );

    let report = orchestrator
        .run(&[RowFactory::header("Only a header")])
        .await;

    assert!(report.success);
    assert_eq!(report.imported, 0);
    assert!(report.message.contains("Nothing to import"));
}

#[tokio::test]
async fn test_report_serializes() {
    let orchestrator = Orchestrator::new(
        fast_config(),
        credentials(1, 60),
        Arc::new(OfflineEnrichment::new()),
        Arc::new(InMemoryCatalogStore::new()),
        single_category(2),
    );

    let report = orchestrator.run(&RowFactory::products(2)).await;
    let json = serde_json::to_value(&report).expect("report serializes");

    assert_eq!(json["imported"], 2);
    assert_eq!(json["success"], true);
    assert!(json["performance"]["workers"].is_array());
}
