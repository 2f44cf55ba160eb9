// ABOUTME: Anthropic Claude adapter implementing the TextProvider trait.
// ABOUTME: Sends a single-turn Messages API request and returns the first text block of the reply.

use std::time::Duration;

use async_trait::async_trait;
use kaizen_core::ProviderError;
use serde_json::{Value, json};

use crate::providers::{
    MAX_TOKENS, ProviderSettings, TextProvider, ensure_success, http_client, system_or_default,
};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API adapter. Preferred provider when configured.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicProvider {
    /// Read settings from the environment.
    /// Required: `ANTHROPIC_API_KEY`
    /// Optional: `ANTHROPIC_BASE_URL` (defaults to https://api.anthropic.com)
    /// Optional: `ANTHROPIC_MODEL` (defaults to claude-3-5-sonnet-20241022)
    pub fn settings_from_env() -> Option<ProviderSettings> {
        ProviderSettings::from_env("ANTHROPIC", DEFAULT_MODEL, DEFAULT_BASE_URL)
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

    /// Build the JSON request body for the Messages API.
    pub fn build_request_body(&self, prompt: &str, system: &str) -> Value {
        json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "system": system_or_default(system),
            "messages": [
                { "role": "user", "content": prompt }
            ]
        })
    }

    /// Pull the reply text out of a Messages API response.
    pub fn parse_response(response_body: &Value) -> Result<String, ProviderError> {
        let content = response_body
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                ProviderError::InvalidResponse("missing content array in response".to_string())
            })?;

        content
            .iter()
            .filter(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
            .filter_map(|block| block.get("text").and_then(|t| t.as_str()))
            .find(|text| !text.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                ProviderError::InvalidResponse("no text content in response".to_string())
            })
    }
}

#[async_trait]
impl TextProvider for AnthropicProvider {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, ProviderError> {
        let body = self.build_request_body(prompt, system);
        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let response = ensure_success(response, "ANTHROPIC_API_KEY").await?;

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse JSON: {}", e)))?;

        Self::parse_response(&response_body)
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{DEFAULT_SYSTEM_PROMPT, mock};
    use axum::Json;
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;

    fn provider(base_url: &str) -> AnthropicProvider {
        let settings = ProviderSettings {
            api_key: "test-key".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: base_url.to_string(),
        };
        AnthropicProvider::new(&settings, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn anthropic_provider_creation() {
        let provider = provider(DEFAULT_BASE_URL);

        assert_eq!(provider.provider_name(), "anthropic");
        assert_eq!(provider.model_name(), "claude-3-5-sonnet-20241022");
        assert_eq!(provider.api_key, "test-key");
        assert_eq!(provider.base_url, "https://api.anthropic.com");
    }

    #[test]
    fn anthropic_builds_request_body() {
        let provider = provider(DEFAULT_BASE_URL);
        let body = provider.build_request_body("Analyze this bakery", "You are an analyst.");

        assert_eq!(
            body.get("model").and_then(|m| m.as_str()),
            Some("claude-3-5-sonnet-20241022")
        );
        assert_eq!(body.get("max_tokens").and_then(|m| m.as_u64()), Some(4096));
        assert_eq!(body["system"], "You are an analyst.");

        let messages = body.get("messages").and_then(|m| m.as_array()).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "Analyze this bakery");
    }

    #[test]
    fn anthropic_substitutes_default_system_prompt() {
        let provider = provider(DEFAULT_BASE_URL);
        let body = provider.build_request_body("hi", "");
        assert_eq!(body["system"], DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn anthropic_parses_text_response() {
        let response = json!({
            "id": "msg_456",
            "type": "message",
            "role": "assistant",
            "content": [
                { "type": "text", "text": "{\"agents\": []}" }
            ],
            "stop_reason": "end_turn"
        });

        let text = AnthropicProvider::parse_response(&response).unwrap();
        assert_eq!(text, "{\"agents\": []}");
    }

    #[test]
    fn anthropic_rejects_response_without_text() {
        let response = json!({
            "id": "msg_end",
            "content": [],
            "stop_reason": "end_turn"
        });

        let err = AnthropicProvider::parse_response(&response).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));

        let err = AnthropicProvider::parse_response(&json!({ "error": "boom" })).unwrap_err();
        assert!(err.to_string().contains("missing content"));
    }

    #[tokio::test]
    async fn anthropic_generate_round_trips_through_http() {
        let router = Router::new().route(
            "/v1/messages",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["x-api-key"], "test-key");
                assert_eq!(headers["anthropic-version"], API_VERSION);
                let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
                Json(json!({
                    "content": [{ "type": "text", "text": format!("echo: {}", prompt) }],
                    "stop_reason": "end_turn"
                }))
            }),
        );
        let base_url = mock::serve(router).await;

        let text = provider(&base_url).generate("ping", "").await.unwrap();
        assert_eq!(text, "echo: ping");
    }

    #[tokio::test]
    async fn anthropic_generate_classifies_auth_failure() {
        let router = Router::new().route(
            "/v1/messages",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid x-api-key") }),
        );
        let base_url = mock::serve(router).await;

        let err = provider(&base_url).generate("ping", "").await.unwrap_err();
        assert!(matches!(err, ProviderError::Unauthorized { .. }));
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
        assert!(err.to_string().contains("invalid x-api-key"));
    }

    #[tokio::test]
    async fn anthropic_generate_keeps_rate_limit_body() {
        let router = Router::new().route(
            "/v1/messages",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "Your credit balance is too low") }),
        );
        let base_url = mock::serve(router).await;

        let err = provider(&base_url).generate("ping", "").await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::RateLimited("Your credit balance is too low".to_string())
        );
        assert!(err.to_string().contains("credit balance"), "got: {}", err);
    }

    #[tokio::test]
    async fn anthropic_generate_keeps_forbidden_body() {
        let router = Router::new().route(
            "/v1/messages",
            post(|| async { (StatusCode::FORBIDDEN, "organization disabled") }),
        );
        let base_url = mock::serve(router).await;

        let err = provider(&base_url).generate("ping", "").await.unwrap_err();
        assert!(err.to_string().contains("organization disabled"), "got: {}", err);
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"), "got: {}", err);
    }

    #[tokio::test]
    async fn anthropic_generate_keeps_server_error_body() {
        let router = Router::new().route(
            "/v1/messages",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "overloaded_error") }),
        );
        let base_url = mock::serve(router).await;

        let err = provider(&base_url).generate("ping", "").await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::Status {
                status: 503,
                body: "overloaded_error".to_string()
            }
        );
    }

    #[tokio::test]
    #[cfg(feature = "live-test")]
    async fn anthropic_adapter_basic() {
        let settings =
            AnthropicProvider::settings_from_env().expect("ANTHROPIC_API_KEY must be set");
        let provider = AnthropicProvider::new(&settings, Duration::from_secs(60)).unwrap();

        let result = provider.generate("Reply with the word ok.", "").await;
        assert!(result.is_ok(), "live test failed: {:?}", result.err());
    }
}
