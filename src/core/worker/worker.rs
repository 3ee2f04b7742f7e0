//! Worker loop

use super::types::{
    CommitReport, RowOutcome, RowRef, Termination, WorkerSettings, WorkerState, WorkerStatus,
};
use crate::core::credentials::CredentialPool;
use crate::core::queue::WorkQueue;
use crate::core::traits::{CatalogStore, CategoryLookup, EnrichmentService};
use crate::core::types::{CategoryId, CategoryRef, CommitOutcome, QueuedRow};
use crate::utils::error::{PipelineError, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Shared collaborators handed to every worker of a batch
#[derive(Clone)]
pub struct WorkerContext {
    pub queue: Arc<WorkQueue>,
    pub pool: Arc<CredentialPool>,
    pub enrichment: Arc<dyn EnrichmentService>,
    pub store: Arc<dyn CatalogStore>,
    pub categories: Arc<dyn CategoryLookup>,
    pub settings: WorkerSettings,
    /// Receives the outcome of every commit task
    pub commits: Option<mpsc::UnboundedSender<CommitReport>>,
}

/// One concurrent row processor
pub struct Worker {
    pub(super) id: usize,
    pub(super) ctx: WorkerContext,
    pub(super) cancel: CancellationToken,
    status: watch::Sender<WorkerStatus>,
    category_ids: HashMap<CategoryRef, CategoryId>,
}

impl Worker {
    /// Create a worker and the receiver its status is published on
    pub fn new(
        id: usize,
        ctx: WorkerContext,
        cancel: CancellationToken,
    ) -> (Self, watch::Receiver<WorkerStatus>) {
        let credential_id = ctx.pool.assign_credential(id).id.clone();
        let (status, receiver) = watch::channel(WorkerStatus::new(id, credential_id));
        let worker = Self {
            id,
            ctx,
            cancel,
            status,
            category_ids: HashMap::new(),
        };
        (worker, receiver)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    fn update(&self, f: impl FnOnce(&mut WorkerStatus)) {
        self.status.send_modify(f);
    }

    /// Drain the queue until it is empty, the worker is cancelled or it gives up
    pub async fn run(mut self) -> Termination {
        self.update(|s| {
            s.state = WorkerState::Working;
            s.started_at = Some(Utc::now());
        });
        debug!(worker_id = self.id, "Worker started");

        let termination = self.process_queue().await;

        let state = termination.state();
        self.update(|s| {
            s.state = state;
            s.current_row = None;
            s.ended_at = Some(Utc::now());
        });

        let status = self.status.borrow().clone();
        match &termination {
            Termination::Fatal(reason) => error!(
                worker_id = self.id,
                processed = status.processed_count,
                errors = status.error_count,
                "Worker failed: {}",
                reason
            ),
            _ => info!(
                worker_id = self.id,
                processed = status.processed_count,
                imported = status.imported_count,
                skipped = status.skipped_count,
                errors = status.error_count,
                "Worker {}",
                termination
            ),
        }

        termination
    }

    async fn process_queue(&mut self) -> Termination {
        loop {
            if self.cancel.is_cancelled() {
                return Termination::Cancelled;
            }

            let Some(row) = self.ctx.queue.take_next() else {
                return Termination::Completed;
            };

            let current = RowRef {
                row_index: row.row_index,
                name: row.name().to_string(),
            };
            self.update(|s| s.current_row = Some(current));

            let outcome = self.process_row(&row).await;

            // An interrupted row was never finished; leave it unaccounted
            if matches!(&outcome, Err(e) if e.is_cancelled()) {
                debug!(worker_id = self.id, row_index = row.row_index, "Row interrupted");
                return Termination::Cancelled;
            }

            self.ctx.queue.mark_processed();
            let max_failures = self.ctx.settings.max_consecutive_failures;
            let mut fatal = None;

            self.status.send_modify(|s| {
                s.processed_count += 1;
                s.current_row = None;
                match &outcome {
                    Ok(RowOutcome::Imported) => {
                        s.imported_count += 1;
                        s.consecutive_failures = 0;
                    }
                    Ok(RowOutcome::Skipped) => {
                        s.skipped_count += 1;
                        s.consecutive_failures = 0;
                    }
                    Err(e) => {
                        s.record_error(row.row_index, row.name(), e);
                        s.consecutive_failures += 1;
                        if !e.is_row_level() {
                            fatal = Some(e.to_string());
                        } else if s.consecutive_failures > max_failures && s.imported_count == 0 {
                            fatal = Some(format!(
                                "{} consecutive failures without a successful row",
                                s.consecutive_failures
                            ));
                        }
                    }
                }
            });

            if let Err(e) = &outcome {
                warn!(
                    worker_id = self.id,
                    row_index = row.row_index,
                    "Row {} failed: {}",
                    row, e
                );
            }

            if let Some(reason) = fatal {
                return Termination::Fatal(reason);
            }
        }
    }

    async fn process_row(&mut self, row: &QueuedRow) -> Result<RowOutcome> {
        if self.ctx.store.is_committed(row.code()).await? {
            debug!(
                worker_id = self.id,
                row_index = row.row_index,
                code = row.code(),
                "Already committed, skipping"
            );
            return Ok(RowOutcome::Skipped);
        }

        let category = self
            .ctx
            .categories
            .category_for_index(row.row_index)
            .ok_or_else(|| {
                PipelineError::category(format!("no category covers row {}", row.row_index))
            })?;
        let category_id = self.category_id(&category).await?;

        let record = self.enrich(row, &category, category_id).await?;
        record.validate()?;

        if self.cancel.is_cancelled() {
            return Err(PipelineError::cancelled("cancelled before commit"));
        }

        // The commit runs on its own task so dropping this worker (timeout)
        // cannot leave a half-written record.
        let store = Arc::clone(&self.ctx.store);
        let commits = self.ctx.commits.clone();
        let (worker_id, row_index) = (self.id, row.row_index);
        let outcome = tokio::spawn(async move {
            let result = store.commit(&record).await;
            if let Some(commits) = commits {
                let _ = commits.send(CommitReport {
                    worker_id,
                    row_index,
                    result: result.as_ref().copied().map_err(|e| e.to_string()),
                });
            }
            result
        })
        .await
        .map_err(|e| PipelineError::internal(format!("commit task failed: {}", e)))??;

        match outcome {
            CommitOutcome::Inserted => Ok(RowOutcome::Imported),
            CommitOutcome::AlreadyPresent => {
                debug!(
                    worker_id = self.id,
                    row_index = row.row_index,
                    "Committed concurrently, counted as skipped"
                );
                Ok(RowOutcome::Skipped)
            }
        }
    }

    async fn category_id(&mut self, category: &CategoryRef) -> Result<CategoryId> {
        if let Some(&id) = self.category_ids.get(category) {
            return Ok(id);
        }
        if self.cancel.is_cancelled() {
            return Err(PipelineError::cancelled("cancelled before category lookup"));
        }
        let id = self.ctx.store.ensure_category_exists(category).await?;
        self.category_ids.insert(category.clone(), id);
        Ok(id)
    }
}
