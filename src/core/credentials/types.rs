//! Credential pool snapshots

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Worker to credential mapping for one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialAssignment {
    /// Worker id to credential id
    pub mapping: BTreeMap<usize, String>,
    /// Credential index to number of workers using it
    pub distribution: BTreeMap<usize, usize>,
    /// Every credential carries the same number of workers
    pub balanced: bool,
}

impl CredentialAssignment {
    pub fn worker_count(&self) -> usize {
        self.mapping.len()
    }

    pub fn credential_for(&self, worker_id: usize) -> Option<&str> {
        self.mapping.get(&worker_id).map(String::as_str)
    }
}

/// Usage of one credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialUsage {
    pub id: String,
    pub requests_per_minute: u32,
    /// Calls counted against the current window
    pub used_in_window: u32,
    /// Calls issued since the pool was built
    pub total_calls: u64,
    /// Times a caller had to wait for the window
    pub throttled: u64,
}

/// Read-only snapshot of the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    pub credentials: Vec<CredentialUsage>,
    pub total_credentials: usize,
    /// Worker count the budgets support
    pub worker_count: usize,
}

impl PoolStatus {
    pub fn used_in_window(&self) -> u32 {
        self.credentials.iter().map(|c| c.used_in_window).sum()
    }
}
