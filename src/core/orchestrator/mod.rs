//! Batch orchestration
//!
//! Resumes from the last committed row, sizes the worker pool from the
//! credential budgets, runs the workers and turns their outcomes into a
//! [`BatchReport`].

mod circuit_breaker;
#[allow(clippy::module_inception)]
mod orchestrator;
mod report;


pub use circuit_breaker::{CircuitBreaker, CircuitBreakerMetrics, CircuitState};
pub use orchestrator::{Orchestrator, OrchestratorConfig, RunOptions};
pub use report::{BatchReport, PerformanceSummary, WorkerPerformance, bound_errors, per_minute};
