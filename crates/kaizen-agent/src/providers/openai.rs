// ABOUTME: OpenAI adapter implementing the TextProvider trait.
// ABOUTME: Sends a Chat Completions request and returns the first choice's message content.

use std::time::Duration;

use async_trait::async_trait;
use kaizen_core::ProviderError;
use serde_json::{Value, json};

use crate::providers::{MAX_TOKENS, ProviderSettings, TextProvider, ensure_success, http_client};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI Chat Completions adapter. Used as the fallback provider.
pub struct OpenAIProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIProvider {
    /// Read settings from the environment.
    /// Required: `OPENAI_API_KEY`
    /// Optional: `OPENAI_BASE_URL` (defaults to https://api.openai.com)
    /// Optional: `OPENAI_MODEL` (defaults to gpt-4o-mini)
    pub fn settings_from_env() -> Option<ProviderSettings> {
        ProviderSettings::from_env("OPENAI", DEFAULT_MODEL, DEFAULT_BASE_URL)
    }

    /// Create a provider whose HTTP calls give up after `timeout`.
    pub fn new(settings: &ProviderSettings, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
        })
    }

    /// Build the JSON request body for the Chat Completions API. The system
    /// message is only sent when the instruction is non-empty.
    pub fn build_request_body(&self, prompt: &str, system: &str) -> Value {
        let mut messages = Vec::with_capacity(2);
        if !system.trim().is_empty() {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": prompt }));

        json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": messages
        })
    }

    /// Pull the reply text out of a Chat Completions response.
    pub fn parse_response(response_body: &Value) -> Result<String, ProviderError> {
        let choices = response_body
            .get("choices")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                ProviderError::InvalidResponse("missing choices array in response".to_string())
            })?;

        let choice = choices
            .first()
            .ok_or_else(|| ProviderError::InvalidResponse("empty choices array".to_string()))?;

        let message = choice.get("message").ok_or_else(|| {
            ProviderError::InvalidResponse("missing message in choice".to_string())
        })?;

        match message.get("content").and_then(|c| c.as_str()) {
            Some(content) if !content.is_empty() => Ok(content.to_string()),
            _ => Err(ProviderError::InvalidResponse(
                "no text content in response".to_string(),
            )),
        }
    }
}

#[async_trait]
impl TextProvider for OpenAIProvider {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, ProviderError> {
        let body = self.build_request_body(prompt, system);
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let response = ensure_success(response, "OPENAI_API_KEY").await?;

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse JSON: {}", e)))?;

        Self::parse_response(&response_body)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
