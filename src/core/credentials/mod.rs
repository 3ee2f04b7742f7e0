//! Credential pool and rate-limit scheduler
//!
//! Every outbound enrichment call is issued through [`CredentialPool::invoke`],
//! which charges the call against the budget of the credential assigned to the
//! calling worker and waits when that budget is spent.

mod assignment;
mod pool;
mod types;


pub use assignment::{credential_capacity, round_robin_index, worker_count_for};
pub use pool::CredentialPool;
pub use types::{CredentialAssignment, CredentialUsage, PoolStatus};
