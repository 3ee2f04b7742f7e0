//! Worker sizing and credential selection

/// Workers a single credential can carry
///
/// `min(max_per_credential, max(1, budget / per_worker_rpm))`
pub fn credential_capacity(budget: u32, per_worker_rpm: u32, max_per_credential: usize) -> usize {
    let by_budget = (budget / per_worker_rpm.max(1)).max(1) as usize;
    by_budget.min(max_per_credential.max(1))
}

/// Worker count supported by a set of budgets
///
/// The ideal is the combined budget divided by what one worker consumes. It is
/// clamped to `[1, total capacity]` and then to the caller's cap.
pub fn worker_count_for(
    budgets: &[u32],
    per_worker_rpm: u32,
    max_per_credential: usize,
    max_workers: Option<usize>,
) -> usize {
    if budgets.is_empty() {
        return 0;
    }

    let capacity: usize = budgets
        .iter()
        .map(|&b| credential_capacity(b, per_worker_rpm, max_per_credential))
        .sum();
    let total_budget: u64 = budgets.iter().map(|&b| u64::from(b)).sum();
    let ideal = (total_budget / u64::from(per_worker_rpm.max(1))) as usize;

    let count = ideal.clamp(1, capacity.max(1));
    match max_workers {
        Some(cap) => count.min(cap.max(1)),
        None => count,
    }
}

/// Round-robin credential index for a worker
pub fn round_robin_index(worker_id: usize, credential_count: usize) -> usize {
    if credential_count == 0 {
        return 0;
    }
    worker_id % credential_count
}
