//! Error handling for the pipeline
//!
//! This module defines the error type shared by the queue, the credential pool,
//! the workers and the collaborator adapters.

mod helpers;
mod types;

pub use types::{PipelineError, Result};
