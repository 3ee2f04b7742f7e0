//! Batch report

use super::circuit_breaker::CircuitBreakerMetrics;
use crate::core::worker::{WorkerState, WorkerStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of one batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: String,
    pub success: bool,
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
    pub message: String,
    /// Rows skipped at the start because a previous batch committed them
    pub resumed_from: usize,
    pub performance: PerformanceSummary,
}

impl BatchReport {
    /// Report for a batch that never spawned a worker
    pub fn failed(batch_id: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            batch_id: batch_id.into(),
            success: false,
            imported: 0,
            skipped: 0,
            errors: vec![message.clone()],
            message,
            resumed_from: 0,
            performance: PerformanceSummary::default(),
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Timing and throughput for the batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_duration_secs: f64,
    pub rows_processed: usize,
    pub rows_per_minute: f64,
    pub worker_count: usize,
    /// Credential id to number of workers using it
    pub credential_distribution: BTreeMap<String, usize>,
    pub workers: Vec<WorkerPerformance>,
    pub circuit_breaker: Option<CircuitBreakerMetrics>,
}

/// Per-worker figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerPerformance {
    pub worker_id: usize,
    pub credential_id: String,
    pub state: WorkerState,
    /// Human readable terminal outcome
    pub outcome: String,
    pub duration_secs: f64,
    pub processed: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: usize,
    pub rows_per_minute: f64,
}

impl WorkerPerformance {
    pub fn from_status(status: &WorkerStatus, outcome: impl Into<String>) -> Self {
        let duration_secs = match (status.started_at, status.ended_at) {
            (Some(start), Some(end)) => (end - start).num_milliseconds().max(0) as f64 / 1000.0,
            _ => 0.0,
        };

        Self {
            worker_id: status.id,
            credential_id: status.credential_id.clone(),
            state: status.state,
            outcome: outcome.into(),
            duration_secs,
            processed: status.processed_count,
            imported: status.imported_count,
            skipped: status.skipped_count,
            errors: status.error_count,
            rows_per_minute: per_minute(status.processed_count, duration_secs),
        }
    }
}

/// Throughput, zero when no time has elapsed
pub fn per_minute(count: usize, duration_secs: f64) -> f64 {
    if duration_secs <= 0.0 {
        return 0.0;
    }
    count as f64 * 60.0 / duration_secs
}

/// Keep at most `max` errors, summarising the rest in one trailing entry
pub fn bound_errors(mut errors: Vec<String>, max: usize) -> Vec<String> {
    if errors.len() > max {
        let dropped = errors.len() - max;
        errors.truncate(max);
        errors.push(format!("... and {} more", dropped));
    }
    errors
}
