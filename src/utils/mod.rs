//! Utility modules for the catalog pipeline
//!
//! - **error**: the shared error type and result alias
//! - **logging**: subscriber setup for the binary

pub mod error;
pub mod logging;

/// Truncate a string to `max_chars` characters, appending an ellipsis
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
