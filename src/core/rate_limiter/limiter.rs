//! Core rate limiter implementation

use super::types::{RateLimitEntry, RateLimitResult};
use crate::config::models::{RateLimitConfig, RateLimitStrategy};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Request budget for a single credential
#[derive(Debug)]
pub struct RateLimiter {
    /// Requests allowed per window
    pub(super) limit: u32,
    pub(super) strategy: RateLimitStrategy,
    pub(super) enabled: bool,
    /// Window duration
    pub(super) window: Duration,
    pub(super) entry: Mutex<RateLimitEntry>,
}

impl RateLimiter {
    /// Create a limiter for `limit` requests per configured window
    pub fn new(limit: u32, config: &RateLimitConfig) -> Self {
        Self {
            limit,
            strategy: config.strategy,
            enabled: config.enabled,
            window: config.window(),
            entry: Mutex::new(RateLimitEntry::default()),
        }
    }

    /// Create a limiter with a custom window
    pub fn with_window(limit: u32, strategy: RateLimitStrategy, window: Duration) -> Self {
        Self {
            limit,
            strategy,
            enabled: true,
            window,
            entry: Mutex::new(RateLimitEntry::default()),
        }
    }

    /// Check if a request would be allowed (read-only, does not record)
    pub fn check(&self) -> RateLimitResult {
        self.evaluate(false)
    }

    /// Atomically check and record a request
    ///
    /// Both steps happen under one lock acquisition, so two callers can never
    /// both take the last slot.
    pub fn check_and_record(&self) -> RateLimitResult {
        self.evaluate(true)
    }

    fn evaluate(&self, record: bool) -> RateLimitResult {
        if !self.enabled {
            if record {
                self.entry.lock().total_recorded += 1;
            }
            return RateLimitResult::unlimited(self.limit);
        }

        let now = Instant::now();
        let mut entry = self.entry.lock();
        match self.strategy {
            RateLimitStrategy::SlidingWindow => self.sliding_window(&mut entry, now, record),
            RateLimitStrategy::FixedWindow => self.fixed_window(&mut entry, now, record),
        }
    }

    /// Requests counted against the current window
    pub fn used_in_window(&self) -> u32 {
        self.check().current_count
    }

    /// Requests recorded since creation
    pub fn total_recorded(&self) -> u64 {
        self.entry.lock().total_recorded
    }

    /// Check if rate limiting is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get the configured limit
    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
