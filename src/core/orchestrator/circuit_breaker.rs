//! Batch circuit breaker
//!
//! Watches worker outcomes and opens once more than half of the spawned
//! workers have ended fatally. An open breaker never closes again within the
//! same batch.

use crate::core::worker::Termination;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Workers keep running
    Closed,
    /// Remaining workers must be cancelled
    Open,
}

/// Circuit breaker metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitBreakerMetrics {
    pub state: CircuitState,
    /// Workers spawned for the batch
    pub spawned: usize,
    /// Workers that have reported an outcome
    pub finished: usize,
    /// Workers that ended with a fatal error, a timeout or a panic
    pub fatal: usize,
}

pub struct CircuitBreaker {
    spawned: usize,
    state: Mutex<CircuitState>,
    finished: AtomicUsize,
    fatal: AtomicUsize,
}

impl CircuitBreaker {
    pub fn new(spawned: usize) -> Self {
        Self {
            spawned,
            state: Mutex::new(CircuitState::Closed),
            finished: AtomicUsize::new(0),
            fatal: AtomicUsize::new(0),
        }
    }

    /// Count one worker outcome
    ///
    /// Returns `true` only for the outcome that opens the circuit.
    pub fn record(&self, termination: &Termination) -> bool {
        self.finished.fetch_add(1, Ordering::Relaxed);
        if !termination.is_fatal() {
            return false;
        }

        let fatal = self.fatal.fetch_add(1, Ordering::Relaxed) + 1;
        let mut state = self.state.lock();
        if *state == CircuitState::Closed && fatal * 2 > self.spawned {
            warn!(
                "Circuit breaker opening: {} of {} workers failed",
                fatal, self.spawned
            );
            *state = CircuitState::Open;
            return true;
        }

        debug!(fatal, spawned = self.spawned, "Fatal worker outcome recorded");
        false
    }

    pub fn is_open(&self) -> bool {
        *self.state.lock() == CircuitState::Open
    }

    pub fn state(&self) -> CircuitState {
        *self.state.lock()
    }

    pub fn fatal_count(&self) -> usize {
        self.fatal.load(Ordering::Relaxed)
    }

    /// Get current metrics
    pub fn metrics(&self) -> CircuitBreakerMetrics {
        CircuitBreakerMetrics {
            state: self.state(),
            spawned: self.spawned,
            finished: self.finished.load(Ordering::Relaxed),
            fatal: self.fatal_count(),
        }
    }
}
