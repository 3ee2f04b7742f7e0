//! Rate limiting strategy implementations

use super::limiter::RateLimiter;
use super::types::{RateLimitEntry, RateLimitResult};
use std::time::{Duration, Instant};
use tracing::trace;

/// Smallest wait handed back to a throttled caller
const MIN_RETRY: Duration = Duration::from_millis(1);

impl RateLimiter {
    /// Sliding window rate limiting implementation
    /// If `record` is true, atomically records the request if allowed
    pub(super) fn sliding_window(
        &self,
        entry: &mut RateLimitEntry,
        now: Instant,
        record: bool,
    ) -> RateLimitResult {
        // Remove expired timestamps
        while let Some(&oldest) = entry.timestamps.front() {
            if now.duration_since(oldest) >= self.window {
                entry.timestamps.pop_front();
            } else {
                break;
            }
        }

        let current_count = entry.timestamps.len() as u32;
        let allowed = current_count < self.limit;

        // Time until the oldest request leaves the window
        let reset_after = entry
            .timestamps
            .front()
            .map(|&oldest| self.window.saturating_sub(now.duration_since(oldest)))
            .unwrap_or(self.window);

        self.finish(entry, now, record, allowed, current_count, reset_after)
    }

    /// Fixed window rate limiting implementation
    /// If `record` is true, atomically records the request if allowed
    pub(super) fn fixed_window(
        &self,
        entry: &mut RateLimitEntry,
        now: Instant,
        record: bool,
    ) -> RateLimitResult {
        // The window opens with its first request
        let window_start = match entry.timestamps.front() {
            Some(&first) if now.duration_since(first) < self.window => first,
            Some(_) => {
                entry.timestamps.clear();
                now
            }
            None => now,
        };

        let current_count = entry.timestamps.len() as u32;
        let allowed = current_count < self.limit;
        let reset_after = self.window.saturating_sub(now.duration_since(window_start));

        self.finish(entry, now, record, allowed, current_count, reset_after)
    }

    fn finish(
        &self,
        entry: &mut RateLimitEntry,
        now: Instant,
        record: bool,
        allowed: bool,
        current_count: u32,
        reset_after: Duration,
    ) -> RateLimitResult {
        let remaining = self.limit.saturating_sub(current_count);

        let retry_after = if allowed {
            if record {
                entry.timestamps.push_back(now);
                entry.total_recorded += 1;
            }
            None
        } else {
            trace!(
                "Rate limit reached: {}/{} requests, retry in {:?}",
                current_count, self.limit, reset_after
            );
            Some(reset_after.max(MIN_RETRY))
        };

        RateLimitResult {
            allowed,
            current_count: if record && allowed {
                current_count + 1
            } else {
                current_count
            },
            limit: self.limit,
            // Adjust remaining if we just recorded
            remaining: if record && allowed {
                remaining.saturating_sub(1)
            } else {
                remaining
            },
            reset_after,
            retry_after,
        }
    }
}
