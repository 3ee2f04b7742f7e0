//! Core functionality for the pipeline
//!
//! This module contains the batch engine: the shared work queue, the
//! credential pool with its rate limiters, resume discovery, workers and the
//! orchestrator that ties them together.

pub mod credentials;
pub mod orchestrator;
pub mod queue;
pub mod rate_limiter; // Per-credential request windows
pub mod resume;
pub mod traits;
pub mod types;
pub mod worker;

// Re-export commonly used types
pub use credentials::{CredentialAssignment, CredentialPool, PoolStatus};
pub use orchestrator::{BatchReport, Orchestrator, OrchestratorConfig, RunOptions};
pub use queue::WorkQueue;
pub use resume::ResumeLocator;
pub use worker::{Termination, Worker, WorkerState, WorkerStatus};
