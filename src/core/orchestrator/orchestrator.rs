//! Batch orchestrator

use super::circuit_breaker::CircuitBreaker;
use super::report::{BatchReport, PerformanceSummary, WorkerPerformance, bound_errors, per_minute};
use crate::config::{Config, Credential, PipelineConfig, RateLimitConfig};
use crate::core::credentials::CredentialPool;
use crate::core::queue::WorkQueue;
use crate::core::resume::ResumeLocator;
use crate::core::traits::{CatalogStore, CategoryLookup, EnrichmentService};
use crate::core::types::{CommitOutcome, RawRow};
use crate::core::worker::{
    CommitReport, Termination, Worker, WorkerContext, WorkerSettings, WorkerStatus,
};
use crate::utils::error::Result;
use chrono::Utc;
use futures::FutureExt;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

/// Shortest progress interval; `tokio::time::interval` rejects zero
const MIN_PROGRESS_INTERVAL: Duration = Duration::from_millis(1);

/// How long commits left behind by dropped workers may still take
const COMMIT_GRACE: Duration = Duration::from_secs(30);

/// Runtime settings for a batch
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub pipeline: PipelineConfig,
    pub rate_limit: RateLimitConfig,
    /// Wall-clock budget per worker
    pub worker_timeout: Duration,
    /// Interval between progress log lines
    pub progress_interval: Duration,
    /// Window the credential budgets apply to
    pub rate_window: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::new(PipelineConfig::default(), RateLimitConfig::default())
    }
}

impl OrchestratorConfig {
    pub fn new(pipeline: PipelineConfig, rate_limit: RateLimitConfig) -> Self {
        Self {
            worker_timeout: pipeline.worker_timeout(),
            progress_interval: pipeline.progress_interval().max(MIN_PROGRESS_INTERVAL),
            rate_window: rate_limit.window(),
            pipeline,
            rate_limit,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.pipeline.clone(), config.rate_limit.clone())
    }

    pub fn with_worker_timeout(mut self, timeout: Duration) -> Self {
        self.worker_timeout = timeout;
        self
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval.max(MIN_PROGRESS_INTERVAL);
        self
    }

    pub fn with_rate_window(mut self, window: Duration) -> Self {
        self.rate_window = window;
        self
    }
}

/// Per-run overrides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Upper bound on workers for this run
    pub max_workers: Option<usize>,
    /// Process at most this many queued rows
    pub limit: Option<usize>,
}

/// Runs one batch of rows through the worker pool
pub struct Orchestrator {
    config: OrchestratorConfig,
    credentials: Vec<Credential>,
    enrichment: Arc<dyn EnrichmentService>,
    store: Arc<dyn CatalogStore>,
    categories: Arc<dyn CategoryLookup>,
}

impl Orchestrator {
    pub fn new(
        config: OrchestratorConfig,
        credentials: Vec<Credential>,
        enrichment: Arc<dyn EnrichmentService>,
        store: Arc<dyn CatalogStore>,
        categories: Arc<dyn CategoryLookup>,
    ) -> Self {
        Self {
            config,
            credentials,
            enrichment,
            store,
            categories,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Process `rows` with default options
    pub async fn run(&self, rows: &[RawRow]) -> BatchReport {
        self.run_with(rows, RunOptions::default()).await
    }

    /// Process `rows`
    ///
    /// Never fails: problems before any worker starts produce an unsuccessful
    /// report explaining why.
    pub async fn run_with(&self, rows: &[RawRow], options: RunOptions) -> BatchReport {
        let batch_id = Uuid::new_v4().to_string();
        let span = info_span!("batch", batch_id = %batch_id);
        self.execute(batch_id, rows, options).instrument(span).await
    }

    fn build_pool(&self) -> Result<CredentialPool> {
        if self.config.rate_limit.enabled {
            CredentialPool::with_window(
                self.credentials.clone(),
                self.config.rate_limit.strategy,
                self.config.rate_window,
                &self.config.pipeline,
            )
        } else {
            CredentialPool::new(
                self.credentials.clone(),
                &self.config.rate_limit,
                &self.config.pipeline,
            )
        }
    }

    async fn execute(&self, batch_id: String, rows: &[RawRow], options: RunOptions) -> BatchReport {
        let started = Instant::now();
        info!(rows = rows.len(), "Starting batch");

        let pool = match self.build_pool() {
            Ok(pool) => Arc::new(pool),
            Err(e) => {
                error!("Cannot start batch: {}", e);
                return BatchReport::failed(batch_id, format!("Cannot start batch: {}", e));
            }
        };

        let resumed_from = match ResumeLocator::new(Arc::clone(&self.store)).locate(rows).await {
            Ok(offset) => offset,
            Err(e) => {
                error!("Resume lookup failed: {}", e);
                return BatchReport::failed(batch_id, format!("Resume lookup failed: {}", e));
            }
        };

        let queue = Arc::new(WorkQueue::from_rows_limited(rows, resumed_from, options.limit));
        if queue.is_empty() {
            info!(resumed_from, "Nothing to import");
            return BatchReport {
                batch_id,
                success: true,
                imported: 0,
                skipped: 0,
                errors: Vec::new(),
                message: "Nothing to import: no pending rows".to_string(),
                resumed_from,
                performance: PerformanceSummary {
                    total_duration_secs: started.elapsed().as_secs_f64(),
                    ..PerformanceSummary::default()
                },
            };
        }

        let cap = match (options.max_workers, self.config.pipeline.max_workers) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let worker_count = pool
            .optimal_worker_count(cap)
            .min(queue.total_count())
            .max(1);
        let assignment = pool.assign_workers(worker_count);

        info!(
            queued = queue.total_count(),
            resumed_from,
            workers = worker_count,
            credentials = pool.len(),
            balanced = assignment.balanced,
            "Spawning workers"
        );
        if !assignment.balanced {
            debug!(distribution = ?assignment.distribution, "Uneven credential distribution");
        }

        let (commit_tx, commit_rx) = mpsc::unbounded_channel();
        let ctx = WorkerContext {
            queue: Arc::clone(&queue),
            pool: Arc::clone(&pool),
            enrichment: Arc::clone(&self.enrichment),
            store: Arc::clone(&self.store),
            categories: Arc::clone(&self.categories),
            settings: WorkerSettings::from(&self.config.pipeline),
            commits: Some(commit_tx),
        };

        let batch_cancel = CancellationToken::new();
        let breaker = CircuitBreaker::new(worker_count);
        let mut receivers: HashMap<usize, watch::Receiver<WorkerStatus>> = HashMap::new();
        let mut tasks = JoinSet::new();

        for worker_id in 0..worker_count {
            let (worker, receiver) = Worker::new(worker_id, ctx.clone(), batch_cancel.child_token());
            receivers.insert(worker_id, receiver);

            let timeout = self.config.worker_timeout;
            tasks.spawn(
                async move {
                    let run = tokio::time::timeout(timeout, worker.run());
                    let termination = match AssertUnwindSafe(run).catch_unwind().await {
                        Ok(Ok(termination)) => termination,
                        Ok(Err(_elapsed)) => {
                            warn!(worker_id, "Worker exceeded {:?}", timeout);
                            Termination::TimedOut
                        }
                        Err(panic) => {
                            let reason = panic_message(panic.as_ref());
                            error!(worker_id, "Worker panicked: {}", reason);
                            Termination::Panicked(reason)
                        }
                    };
                    (worker_id, termination)
                }
                .in_current_span(),
            );
        }

        let mut outcomes: BTreeMap<usize, Termination> = BTreeMap::new();
        let mut ticker =
            tokio::time::interval(self.config.progress_interval.max(MIN_PROGRESS_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                joined = tasks.join_next() => match joined {
                    Some(Ok((worker_id, termination))) => {
                        if breaker.record(&termination) {
                            warn!("Cancelling remaining workers");
                            batch_cancel.cancel();
                        }
                        outcomes.insert(worker_id, termination);
                    }
                    Some(Err(e)) => {
                        error!("Worker task failed: {}", e);
                        if breaker.record(&Termination::Panicked(e.to_string())) {
                            batch_cancel.cancel();
                        }
                    }
                    None => break,
                },
                _ = ticker.tick() => log_progress(&queue, &pool, &receivers),
            }
        }
        drop(ctx);

        // Rows a timed-out or panicked worker was holding; their commit may
        // still have gone through
        let abandoned: HashSet<usize> = receivers
            .iter()
            .filter(|(id, _)| outcomes.get(*id).is_none_or(dropped_mid_row))
            .filter_map(|(_, receiver)| {
                receiver.borrow().current_row.as_ref().map(|r| r.row_index)
            })
            .collect();
        let mut settled = settle_commits(commit_rx, &abandoned).await;

        // Aggregate
        let mut imported = 0;
        let mut skipped = 0;
        let mut processed = 0;
        let mut row_errors = Vec::new();
        let mut worker_errors = Vec::new();
        let mut workers = Vec::with_capacity(worker_count);
        let mut fatal_workers = 0;

        for worker_id in 0..worker_count {
            let mut status = match receivers.get(&worker_id) {
                Some(receiver) => receiver.borrow().clone(),
                None => continue,
            };
            let termination = outcomes
                .remove(&worker_id)
                .unwrap_or_else(|| Termination::Panicked("worker task lost".to_string()));

            // A worker dropped mid-row never got to account for it
            if dropped_mid_row(&termination) {
                if let Some(row) = status.current_row.take() {
                    status.processed_count += 1;
                    queue.mark_processed();
                    match settled.remove(&row.row_index).map(|r| r.result) {
                        Some(Ok(CommitOutcome::Inserted)) => status.imported_count += 1,
                        Some(Ok(CommitOutcome::AlreadyPresent)) => status.skipped_count += 1,
                        Some(Err(e)) => status.record_error(row.row_index, &row.name, e),
                        None => status.record_error(row.row_index, &row.name, &termination),
                    }
                }
                status.state = termination.state();
                status.ended_at.get_or_insert_with(Utc::now);
            }

            if termination.is_fatal() {
                fatal_workers += 1;
                worker_errors.push(format!("worker {}: {}", worker_id, termination));
            }

            imported += status.imported_count;
            skipped += status.skipped_count;
            processed += status.processed_count;
            row_errors.extend(status.errors.iter().cloned());
            workers.push(WorkerPerformance::from_status(&status, termination.to_string()));
        }

        let breaker_metrics = breaker.metrics();
        let tripped = breaker.is_open();
        let success = !tripped && fatal_workers == 0;
        let total_errors = row_errors.len();

        let message = if tripped {
            format!(
                "Circuit breaker opened: {} of {} workers failed, remaining workers cancelled",
                breaker_metrics.fatal, worker_count
            )
        } else if fatal_workers > 0 {
            format!(
                "{} of {} workers failed; imported {}, skipped {}, {} row errors",
                fatal_workers, worker_count, imported, skipped, total_errors
            )
        } else {
            format!(
                "Imported {} rows, skipped {}, {} row errors",
                imported, skipped, total_errors
            )
        };

        let mut errors = worker_errors;
        errors.extend(row_errors);
        let errors = bound_errors(errors, self.config.pipeline.max_reported_errors);

        let total_duration_secs = started.elapsed().as_secs_f64();
        let credential_distribution = assignment
            .distribution
            .iter()
            .filter_map(|(&index, &count)| {
                self.credentials
                    .get(index)
                    .map(|c| (c.id.clone(), count))
            })
            .collect();

        if success {
            info!(imported, skipped, errors = total_errors, "Batch finished");
        } else {
            warn!(imported, skipped, errors = total_errors, "Batch failed: {}", message);
        }

        BatchReport {
            batch_id,
            success,
            imported,
            skipped,
            errors,
            message,
            resumed_from,
            performance: PerformanceSummary {
                total_duration_secs,
                rows_processed: processed,
                rows_per_minute: per_minute(processed, total_duration_secs),
                worker_count,
                credential_distribution,
                workers,
                circuit_breaker: Some(breaker_metrics),
            },
        }
    }
}

fn dropped_mid_row(termination: &Termination) -> bool {
    matches!(termination, Termination::TimedOut | Termination::Panicked(_))
}

/// Wait for commit tasks to finish and keep the reports for `rows`
async fn settle_commits(
    mut commits: mpsc::UnboundedReceiver<CommitReport>,
    rows: &HashSet<usize>,
) -> HashMap<usize, CommitReport> {
    let mut settled = HashMap::new();
    if rows.is_empty() {
        return settled;
    }

    let drain = async {
        while let Some(report) = commits.recv().await {
            if rows.contains(&report.row_index) {
                debug!(
                    worker_id = report.worker_id,
                    row_index = report.row_index,
                    "Commit finished after its worker ended"
                );
                settled.insert(report.row_index, report);
            }
        }
    };
    if tokio::time::timeout(COMMIT_GRACE, drain).await.is_err() {
        warn!(
            "Commits still running after {:?}, counting their rows as errors",
            COMMIT_GRACE
        );
    }
    settled
}

fn log_progress(
    queue: &WorkQueue,
    pool: &CredentialPool,
    receivers: &HashMap<usize, watch::Receiver<WorkerStatus>>,
) {
    let progress = queue.progress();
    let pool_status = pool.status();
    let active = receivers
        .values()
        .filter(|r| !r.borrow().state.is_terminal())
        .count();

    info!(
        processed = progress.processed,
        total = progress.total,
        remaining = progress.remaining,
        active_workers = active,
        calls_in_window = pool_status.used_in_window(),
        "Progress {:.1}%",
        progress.fraction * 100.0
    );
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
