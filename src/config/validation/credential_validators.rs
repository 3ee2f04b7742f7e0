//! Credential list validators

use crate::config::models::Credential;
use std::collections::HashSet;

/// At least one credential, unique non-empty ids, non-zero budgets
pub fn validate_credentials(credentials: &[Credential]) -> Result<(), String> {
    if credentials.is_empty() {
        return Err(
            "at least one credential is required (set `credentials` or CATALOG_API_KEYS)"
                .to_string(),
        );
    }

    let mut seen = HashSet::new();
    for credential in credentials {
        if credential.id.trim().is_empty() {
            return Err("credential id cannot be empty".to_string());
        }

        if !seen.insert(credential.id.as_str()) {
            return Err(format!("duplicate credential id '{}'", credential.id));
        }

        if credential.requests_per_minute == 0 {
            return Err(format!(
                "credential '{}' must have a requests-per-minute budget greater than 0",
                credential.id
            ));
        }
    }

    Ok(())
}
