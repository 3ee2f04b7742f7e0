//! Row workers
//!
//! A worker drains the shared queue one row at a time: skip rows already in
//! the catalog, resolve the category, enrich through the credential pool,
//! validate and commit. Per-row failures are recorded and the worker moves on.

mod enrichment;
mod types;
#[allow(clippy::module_inception)]
mod worker;


pub use enrichment::{fallback_details, fallback_name, resolve_unit};
pub use types::{CommitReport, RowRef, Termination, WorkerSettings, WorkerState, WorkerStatus};
pub use worker::{Worker, WorkerContext};
