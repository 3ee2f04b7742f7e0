//! Enrichment service configuration

use super::default_timeout;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI-compatible enrichment endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Base URL, without a trailing slash
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Chat model used for translation and descriptions
    #[serde(default = "default_text_model")]
    pub text_model: String,
    /// Image model
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Image size passed to the image endpoint
    #[serde(default = "default_image_size")]
    pub image_size: String,
    /// Language product names and descriptions are written in
    #[serde(default = "default_target_language")]
    pub target_language: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            image_size: default_image_size(),
            target_language: default_target_language(),
            timeout_secs: default_timeout(),
        }
    }
}

impl EnrichmentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_text_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

fn default_target_language() -> String {
    "English".to_string()
}
