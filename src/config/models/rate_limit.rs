//! Rate limiting configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rate limiting configuration shared by every credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable throttling; when off, calls go straight through
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Window accounting strategy
    #[serde(default)]
    pub strategy: RateLimitStrategy,
    /// Window length in seconds; budgets are expressed per window
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            strategy: RateLimitStrategy::default(),
            window_secs: default_window_secs(),
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// Rate limiting strategy
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitStrategy {
    /// Count calls in the trailing window ending now
    #[default]
    SlidingWindow,
    /// Count calls since the window opened; reset when it expires
    FixedWindow,
}

fn default_enabled() -> bool {
    true
}

fn default_window_secs() -> u64 {
    60
}
