//! Batch pipeline configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Worker pool and batch behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Wall-clock budget per worker, in seconds
    #[serde(default = "default_worker_timeout")]
    pub worker_timeout_secs: u64,
    /// Consecutive row failures (with no success yet) a worker tolerates;
    /// one more ends it
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,
    /// Calls per minute one worker is expected to issue
    #[serde(default = "default_per_worker_rpm")]
    pub per_worker_rpm: u32,
    /// Upper bound on workers sharing a single credential
    #[serde(default = "default_max_workers_per_credential")]
    pub max_workers_per_credential: usize,
    /// Optional hard cap on the pool size
    #[serde(default)]
    pub max_workers: Option<usize>,
    /// How often progress is logged while workers run, in seconds
    #[serde(default = "default_progress_interval")]
    pub progress_interval_secs: u64,
    /// Maximum number of error strings kept in the report
    #[serde(default = "default_max_reported_errors")]
    pub max_reported_errors: usize,
    /// Whether to call the image generation service
    #[serde(default = "default_generate_images")]
    pub generate_images: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_timeout_secs: default_worker_timeout(),
            max_consecutive_failures: default_max_consecutive_failures(),
            per_worker_rpm: default_per_worker_rpm(),
            max_workers_per_credential: default_max_workers_per_credential(),
            max_workers: None,
            progress_interval_secs: default_progress_interval(),
            max_reported_errors: default_max_reported_errors(),
            generate_images: default_generate_images(),
        }
    }
}

impl PipelineConfig {
    pub fn worker_timeout(&self) -> Duration {
        Duration::from_secs(self.worker_timeout_secs)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_secs(self.progress_interval_secs)
    }
}

fn default_worker_timeout() -> u64 {
    30 * 60
}

fn default_max_consecutive_failures() -> u32 {
    10
}

fn default_per_worker_rpm() -> u32 {
    15
}

fn default_max_workers_per_credential() -> usize {
    2
}

fn default_progress_interval() -> u64 {
    5
}

fn default_max_reported_errors() -> usize {
    100
}

fn default_generate_images() -> bool {
    true
}
