//! Logging setup
//!
//! Installs the global `tracing` subscriber used by the binary. `RUST_LOG`
//! takes precedence over the level passed in. Log lines go to stderr so the
//! report on stdout stays machine readable.

use crate::utils::error::{PipelineError, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Build the filter from `RUST_LOG`, falling back to `level` for this crate
/// and `warn` for everything else.
pub fn build_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,catalog_enricher={},catalog_import={}",
            level, level
        ))
    })
}

/// Initialize the global subscriber
pub fn init_logging(format: LogFormat, level: Level) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };

    installed.map_err(|e| PipelineError::internal(format!("Failed to install logger: {}", e)))
}
