//! Rate limiter types and data structures

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rate limit result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Current request count in the window
    pub current_count: u32,
    /// Maximum requests allowed
    pub limit: u32,
    /// Remaining requests in the window
    pub remaining: u32,
    /// Time until the window frees a slot or resets
    pub reset_after: Duration,
    /// Wait before retrying (only set when not allowed)
    pub retry_after: Option<Duration>,
}

impl RateLimitResult {
    pub(super) fn unlimited(limit: u32) -> Self {
        Self {
            allowed: true,
            current_count: 0,
            limit,
            remaining: limit,
            reset_after: Duration::ZERO,
            retry_after: None,
        }
    }
}

/// Request log for one credential
#[derive(Debug, Clone, Default)]
pub(super) struct RateLimitEntry {
    /// Request timestamps inside the current window, oldest first
    pub(super) timestamps: VecDeque<Instant>,
    /// Requests ever recorded
    pub(super) total_recorded: u64,
}
