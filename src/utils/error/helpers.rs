//! Helper functions for creating specific error types

use super::types::PipelineError;

/// Helper functions for creating specific errors
impl PipelineError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn enrichment<S: Into<String>>(message: S) -> Self {
        Self::Enrichment(message.into())
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    pub fn category<S: Into<String>>(message: S) -> Self {
        Self::Category(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn cancelled<S: Into<String>>(message: S) -> Self {
        Self::Cancelled(message.into())
    }

    pub fn no_credentials<S: Into<String>>(message: S) -> Self {
        Self::NoCredentials(message.into())
    }

    pub fn worker_fatal<S: Into<String>>(message: S) -> Self {
        Self::WorkerFatal(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Build an enrichment error from a non-success HTTP response
    pub fn api_error<S: Into<String>>(status_code: u16, body: S) -> Self {
        Self::Enrichment(format!("HTTP {}: {}", status_code, body.into()))
    }
}

impl PipelineError {
    /// Whether this error came from cooperative cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// Whether the failure is local to a single row
    ///
    /// Row-level failures are recorded and skipped. Anything else ends the
    /// worker that saw it.
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Enrichment(_)
                | Self::Storage(_)
                | Self::Category(_)
                | Self::Database(_)
                | Self::HttpClient(_)
                | Self::Serialization(_)
                | Self::Timeout(_)
        )
    }
}
