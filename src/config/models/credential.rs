//! External-service credential configuration

use super::default_key_rpm;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One access key for the enrichment service and its rate budget
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Stable identifier used in logs and reports
    pub id: String,
    /// Requests per minute this key may issue
    #[serde(alias = "rpm", default = "default_key_rpm")]
    pub requests_per_minute: u32,
    /// Secret sent to the service; optional for offline runs
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl Credential {
    pub fn new(id: impl Into<String>, requests_per_minute: u32) -> Self {
        Self {
            id: id.into(),
            requests_per_minute,
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("requests_per_minute", &self.requests_per_minute)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Parse a comma-separated key list into credentials sharing one budget
///
/// Ids are `key-1`, `key-2`, ... in list order. Blank entries are ignored.
pub fn credentials_from_keys(keys: &str, requests_per_minute: u32) -> Vec<Credential> {
    keys.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .enumerate()
        .map(|(i, key)| {
            Credential::new(format!("key-{}", i + 1), requests_per_minute).with_api_key(key)
        })
        .collect()
}
