//! Pipeline and rate limit validators

use super::trait_def::Validate;
use crate::config::models::{PipelineConfig, RateLimitConfig};

impl Validate for PipelineConfig {
    fn validate(&self) -> Result<(), String> {
        if self.worker_timeout_secs == 0 {
            return Err("worker timeout must be greater than 0".to_string());
        }

        if self.max_consecutive_failures == 0 {
            return Err("max consecutive failures must be greater than 0".to_string());
        }

        if self.per_worker_rpm == 0 {
            return Err("per-worker rpm must be greater than 0".to_string());
        }

        if self.max_workers_per_credential == 0 {
            return Err("max workers per credential must be greater than 0".to_string());
        }

        if self.max_workers == Some(0) {
            return Err("max workers must be greater than 0 when set".to_string());
        }

        if self.progress_interval_secs == 0 {
            return Err("progress interval must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), String> {
        if self.window_secs == 0 {
            return Err("rate limit window must be greater than 0".to_string());
        }

        Ok(())
    }
}
