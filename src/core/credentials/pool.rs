//! Credential pool implementation

use super::assignment::{round_robin_index, worker_count_for};
use super::types::{CredentialAssignment, CredentialUsage, PoolStatus};
use crate::config::models::{Credential, PipelineConfig, RateLimitConfig, RateLimitStrategy};
use crate::config::validation::validate_credentials;
use crate::core::rate_limiter::RateLimiter;
use crate::utils::error::{PipelineError, Result};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Fallback wait when the limiter gives no hint
const DEFAULT_RETRY: Duration = Duration::from_millis(50);

struct CredentialSlot {
    credential: Credential,
    limiter: RateLimiter,
    throttled: AtomicU64,
}

/// Credentials with one independent request budget each
pub struct CredentialPool {
    slots: Vec<CredentialSlot>,
    per_worker_rpm: u32,
    max_workers_per_credential: usize,
}

impl std::fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPool")
            .field(
                "credentials",
                &self
                    .slots
                    .iter()
                    .map(|s| s.credential.id.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("per_worker_rpm", &self.per_worker_rpm)
            .field("max_workers_per_credential", &self.max_workers_per_credential)
            .finish()
    }
}

impl CredentialPool {
    /// Build a pool with the configured window
    pub fn new(
        credentials: Vec<Credential>,
        rate_limit: &RateLimitConfig,
        pipeline: &PipelineConfig,
    ) -> Result<Self> {
        Self::build(credentials, pipeline, |c| {
            RateLimiter::new(c.requests_per_minute, rate_limit)
        })
    }

    /// Build a pool whose budgets apply to a custom window
    pub fn with_window(
        credentials: Vec<Credential>,
        strategy: RateLimitStrategy,
        window: Duration,
        pipeline: &PipelineConfig,
    ) -> Result<Self> {
        Self::build(credentials, pipeline, |c| {
            RateLimiter::with_window(c.requests_per_minute, strategy, window)
        })
    }

    fn build(
        credentials: Vec<Credential>,
        pipeline: &PipelineConfig,
        limiter_for: impl Fn(&Credential) -> RateLimiter,
    ) -> Result<Self> {
        if credentials.is_empty() {
            return Err(PipelineError::no_credentials(
                "at least one credential is required",
            ));
        }
        // A zero budget would park its workers until they time out
        validate_credentials(&credentials).map_err(PipelineError::config)?;

        let slots = credentials
            .into_iter()
            .map(|credential| CredentialSlot {
                limiter: limiter_for(&credential),
                credential,
                throttled: AtomicU64::new(0),
            })
            .collect();

        Ok(Self {
            slots,
            per_worker_rpm: pipeline.per_worker_rpm,
            max_workers_per_credential: pipeline.max_workers_per_credential,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Workers the combined budgets support, optionally capped
    pub fn optimal_worker_count(&self, max_workers: Option<usize>) -> usize {
        let budgets: Vec<u32> = self
            .slots
            .iter()
            .map(|s| s.credential.requests_per_minute)
            .collect();
        worker_count_for(
            &budgets,
            self.per_worker_rpm,
            self.max_workers_per_credential,
            max_workers,
        )
    }

    /// Credential used by a worker
    pub fn assign_credential(&self, worker_id: usize) -> &Credential {
        &self.slot_for(worker_id).credential
    }

    /// Round-robin mapping for `count` workers
    pub fn assign_workers(&self, count: usize) -> CredentialAssignment {
        let mut mapping = BTreeMap::new();
        let mut distribution: BTreeMap<usize, usize> =
            (0..self.slots.len()).map(|i| (i, 0)).collect();

        for worker_id in 0..count {
            let index = round_robin_index(worker_id, self.slots.len());
            mapping.insert(worker_id, self.slots[index].credential.id.clone());
            *distribution.entry(index).or_default() += 1;
        }

        let max = distribution.values().copied().max().unwrap_or(0);
        let min = distribution.values().copied().min().unwrap_or(0);

        CredentialAssignment {
            mapping,
            distribution,
            balanced: max == min,
        }
    }

    /// Issue one outbound call on the worker's credential
    ///
    /// Waits while the credential's window is full. Cancellation interrupts both
    /// the wait and the call itself.
    pub async fn invoke<T, F, Fut>(
        &self,
        worker_id: usize,
        cancel: &CancellationToken,
        call: F,
    ) -> Result<T>
    where
        F: FnOnce(Credential) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let slot = self.slot_for(worker_id);
        self.acquire(slot, worker_id, cancel).await?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PipelineError::cancelled(format!(
                "worker {} call on '{}' interrupted",
                worker_id, slot.credential.id
            ))),
            result = call(slot.credential.clone()) => result,
        }
    }

    async fn acquire(
        &self,
        slot: &CredentialSlot,
        worker_id: usize,
        cancel: &CancellationToken,
    ) -> Result<()> {
        loop {
            if cancel.is_cancelled() {
                return Err(PipelineError::cancelled(format!(
                    "worker {} cancelled before call",
                    worker_id
                )));
            }

            let result = slot.limiter.check_and_record();
            if result.allowed {
                trace!(
                    worker_id,
                    credential = %slot.credential.id,
                    remaining = result.remaining,
                    "call admitted"
                );
                return Ok(());
            }

            let wait = result.retry_after.unwrap_or(DEFAULT_RETRY);
            slot.throttled.fetch_add(1, Ordering::Relaxed);
            debug!(
                worker_id,
                credential = %slot.credential.id,
                wait_ms = wait.as_millis() as u64,
                "rate budget spent, waiting"
            );

            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(PipelineError::cancelled(format!(
                        "worker {} cancelled while throttled",
                        worker_id
                    )));
                }
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }

    /// Snapshot of per-credential usage
    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            credentials: self
                .slots
                .iter()
                .map(|s| CredentialUsage {
                    id: s.credential.id.clone(),
                    requests_per_minute: s.credential.requests_per_minute,
                    used_in_window: s.limiter.used_in_window(),
                    total_calls: s.limiter.total_recorded(),
                    throttled: s.throttled.load(Ordering::Relaxed),
                })
                .collect(),
            total_credentials: self.slots.len(),
            worker_count: self.optimal_worker_count(None),
        }
    }

    fn slot_for(&self, worker_id: usize) -> &CredentialSlot {
        &self.slots[round_robin_index(worker_id, self.slots.len())]
    }
}
