//! OpenAI-compatible enrichment client

use super::prompts;
use crate::config::{Credential, EnrichmentConfig};
use crate::core::traits::EnrichmentService;
use crate::core::types::{CategoryRef, ProductDetails};
use crate::utils::error::{PipelineError, Result};
use crate::utils::truncate_chars;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

/// Longest response body kept in an error message
const MAX_ERROR_BODY: usize = 300;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

/// Enrichment over `/chat/completions` and `/images/generations`
#[derive(Debug, Clone)]
pub struct HttpEnrichmentClient {
    client: Client,
    config: EnrichmentConfig,
}

impl HttpEnrichmentClient {
    pub fn new(config: EnrichmentConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("catalog-enricher/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    async fn post(&self, credential: &Credential, path: &str, body: Value) -> Result<Value> {
        let api_key = credential.api_key.as_deref().ok_or_else(|| {
            PipelineError::config(format!("credential '{}' has no API key", credential.id))
        })?;

        let response = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PipelineError::api_error(
                status.as_u16(),
                truncate_chars(&text, MAX_ERROR_BODY),
            ));
        }

        Ok(response.json().await?)
    }

    async fn chat(
        &self,
        credential: &Credential,
        system: String,
        user: &str,
        json_mode: bool,
    ) -> Result<String> {
        let mut request = json!({
            "model": self.config.text_model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "temperature": 0.2,
        });
        if json_mode {
            request["response_format"] = json!({ "type": "json_object" });
        }

        let response: ChatResponse = serde_json::from_value(
            self.post(credential, "chat/completions", request).await?,
        )?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| PipelineError::enrichment("empty chat completion"))
    }
}

#[async_trait::async_trait]
impl EnrichmentService for HttpEnrichmentClient {
    async fn translate_name(&self, credential: &Credential, name: &str) -> Result<String> {
        let system = prompts::translate_system(&self.config.target_language);
        let content = self.chat(credential, system, name, false).await?;
        let translated = prompts::clean_name(&content);
        debug!(credential = %credential.id, source = name, translated = %translated, "Name translated");
        Ok(translated)
    }

    async fn generate_details(
        &self,
        credential: &Credential,
        name: &str,
        category: &CategoryRef,
    ) -> Result<ProductDetails> {
        let system = prompts::details_system(&self.config.target_language);
        let user = prompts::details_user(name, category);
        let content = self.chat(credential, system, &user, true).await?;
        prompts::parse_details(&content)
    }

    async fn generate_image(
        &self,
        credential: &Credential,
        name: &str,
        description: &str,
    ) -> Result<String> {
        let request = json!({
            "model": self.config.image_model,
            "prompt": prompts::image_prompt(name, description),
            "n": 1,
            "size": self.config.image_size,
            "response_format": "url",
        });

        let response: ImageResponse = serde_json::from_value(
            self.post(credential, "images/generations", request).await?,
        )?;

        response
            .data
            .into_iter()
            .find_map(|d| d.url)
            .ok_or_else(|| PipelineError::enrichment("image response has no URL"))
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}
