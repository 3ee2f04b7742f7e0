//! Worker state and outcomes

use crate::config::PipelineConfig;
use crate::core::types::CommitOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Worker lifecycle
///
/// `Idle -> Working -> {Completed | Failed | Cancelled}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    Idle,
    Working,
    Completed,
    Failed,
    Cancelled,
}

impl WorkerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Working => "working",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// The row a worker currently holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRef {
    pub row_index: usize,
    pub name: String,
}

/// Live view of one worker, written only by that worker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerStatus {
    pub id: usize,
    pub credential_id: String,
    pub state: WorkerState,
    pub current_row: Option<RowRef>,
    pub processed_count: usize,
    pub imported_count: usize,
    pub skipped_count: usize,
    pub error_count: usize,
    pub consecutive_failures: u32,
    pub errors: Vec<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl WorkerStatus {
    pub fn new(id: usize, credential_id: impl Into<String>) -> Self {
        Self {
            id,
            credential_id: credential_id.into(),
            state: WorkerState::Idle,
            current_row: None,
            processed_count: 0,
            imported_count: 0,
            skipped_count: 0,
            error_count: 0,
            consecutive_failures: 0,
            errors: Vec::new(),
            started_at: None,
            ended_at: None,
        }
    }

    /// Record a per-row failure in the `worker N: row I 'name': reason` form
    pub fn record_error(&mut self, row_index: usize, name: &str, reason: impl fmt::Display) {
        self.error_count += 1;
        self.errors.push(format!(
            "worker {}: row {} '{}': {}",
            self.id, row_index, name, reason
        ));
    }
}

/// How a worker ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Queue drained
    Completed,
    /// Cancelled through its token
    Cancelled,
    /// Gave up on its own
    Fatal(String),
    /// Exceeded its wall-clock budget
    TimedOut,
    /// The task panicked
    Panicked(String),
}

impl Termination {
    /// Outcomes counted by the circuit breaker
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_) | Self::TimedOut | Self::Panicked(_))
    }

    pub fn state(&self) -> WorkerState {
        match self {
            Self::Completed => WorkerState::Completed,
            Self::Cancelled => WorkerState::Cancelled,
            Self::Fatal(_) | Self::TimedOut | Self::Panicked(_) => WorkerState::Failed,
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::Fatal(reason) => write!(f, "fatal: {}", reason),
            Self::TimedOut => f.write_str("timed out"),
            Self::Panicked(reason) => write!(f, "panicked: {}", reason),
        }
    }
}

/// Result of a commit task, sent even when the worker that started it is gone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub worker_id: usize,
    pub row_index: usize,
    pub result: std::result::Result<CommitOutcome, String>,
}

/// Knobs each worker needs from the pipeline config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    pub max_consecutive_failures: u32,
    pub generate_images: bool,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for WorkerSettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            max_consecutive_failures: config.max_consecutive_failures,
            generate_images: config.generate_images,
        }
    }
}

/// Result of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RowOutcome {
    Imported,
    Skipped,
}
