// ABOUTME: Provider module aggregating the text-generation adapters.
// ABOUTME: Defines the TextProvider trait plus the HTTP plumbing and settings shared by every adapter.

pub mod anthropic;
pub mod openai;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use kaizen_core::ProviderError;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAIProvider;

/// System instruction used when the caller supplies an empty one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a business analyst AI.";

/// Upper bound on generated tokens for every provider call.
pub const MAX_TOKENS: u32 = 4096;

/// A text-generation service invoked with a prompt and a system instruction.
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Send the prompt and return the provider's raw text reply.
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, ProviderError>;

    /// Provider name for logging and error messages (e.g. "anthropic").
    fn provider_name(&self) -> &str;

    /// Model identifier being used.
    fn model_name(&self) -> &str;
}

/// Credentials and endpoint for one provider.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ProviderSettings {
    /// Read `<PREFIX>_API_KEY`, `<PREFIX>_MODEL` and `<PREFIX>_BASE_URL`.
    /// Returns `None` when the key is unset or blank, meaning the provider
    /// is not configured.
    pub fn from_env(prefix: &str, default_model: &str, default_base_url: &str) -> Option<Self> {
        let api_key = non_empty_env(&format!("{}_API_KEY", prefix))?;
        let model = non_empty_env(&format!("{}_MODEL", prefix))
            .unwrap_or_else(|| default_model.to_string());
        let base_url = non_empty_env(&format!("{}_BASE_URL", prefix))
            .unwrap_or_else(|| default_base_url.to_string());

        Some(Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Read an env var and return `Some(value)` only if it is non-empty after trimming.
pub fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    })
}

/// Build a reqwest client that gives up after `timeout`.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Request(format!("failed to build HTTP client: {}", e)))
}

/// Map a non-2xx provider response to a ProviderError. `key_var` names the
/// credential to check on auth failures.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    key_var: &str,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited(body));
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(ProviderError::Unauthorized {
            hint: format!("check {}", key_var),
            body,
        });
    }

    Err(ProviderError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Pick the caller's system instruction, falling back to the default.
pub(crate) fn system_or_default(system: &str) -> &str {
    if system.trim().is_empty() {
        DEFAULT_SYSTEM_PROMPT
    } else {
        system
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serialize all tests that read/write env vars to prevent race conditions.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn settings_absent_without_key() {
        let _guard = ENV_MUTEX.lock().unwrap();
        // SAFETY: holding ENV_MUTEX, no concurrent env var access
        unsafe {
            std::env::remove_var("KZTEST_A_API_KEY");
        }

        assert!(ProviderSettings::from_env("KZTEST_A", "m", "https://a.example").is_none());
    }

    #[test]
    fn settings_treat_blank_key_as_unset() {
        let _guard = ENV_MUTEX.lock().unwrap();
        // SAFETY: holding ENV_MUTEX, no concurrent env var access
        unsafe {
            std::env::set_var("KZTEST_B_API_KEY", "   ");
        }

        let settings = ProviderSettings::from_env("KZTEST_B", "m", "https://b.example");

        // SAFETY: holding ENV_MUTEX, no concurrent env var access
        unsafe {
            std::env::remove_var("KZTEST_B_API_KEY");
        }

        assert!(settings.is_none());
    }

    #[test]
    fn settings_apply_defaults_and_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        // SAFETY: holding ENV_MUTEX, no concurrent env var access
        unsafe {
            std::env::set_var("KZTEST_C_API_KEY", "sk-test");
            std::env::remove_var("KZTEST_C_MODEL");
            std::env::set_var("KZTEST_C_BASE_URL", "http://localhost:9999/");
        }

        let settings = ProviderSettings::from_env("KZTEST_C", "default-model", "https://c.example");

        // SAFETY: holding ENV_MUTEX, no concurrent env var access
        unsafe {
            std::env::remove_var("KZTEST_C_API_KEY");
            std::env::remove_var("KZTEST_C_BASE_URL");
        }

        let settings = settings.expect("key is set");
        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.model, "default-model");
        assert_eq!(settings.base_url, "http://localhost:9999");
    }

    #[test]
    fn debug_redacts_api_key() {
        let settings = ProviderSettings {
            api_key: "sk-secret".to_string(),
            model: "m".to_string(),
            base_url: "https://x.example".to_string(),
        };
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn empty_system_falls_back_to_default() {
        assert_eq!(system_or_default(""), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(system_or_default("  \n"), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(system_or_default("Be terse."), "Be terse.");
    }
}
