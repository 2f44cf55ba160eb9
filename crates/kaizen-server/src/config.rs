// ABOUTME: Configuration loading and validation for the kaizen server.
// ABOUTME: Reads listen address, upload directory, timeouts, and provider/enrichment credentials from the environment.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use kaizen_agent::{AnthropicProvider, EnrichmentSettings, OpenAIProvider, ProviderSettings};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 120;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT is not a valid port number: {0}")]
    InvalidPort(String),

    #[error("KAIZEN_HOST is not a valid IP address: {0}")]
    InvalidHost(String),

    #[error("KAIZEN_PROVIDER_TIMEOUT_SECS must be a positive number of seconds: {0}")]
    InvalidTimeout(String),
}

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct KaizenConfig {
    pub bind: SocketAddr,
    pub upload_dir: PathBuf,
    pub provider_timeout: Duration,
    pub anthropic: Option<ProviderSettings>,
    pub openai: Option<ProviderSettings>,
    pub enrichment: Option<EnrichmentSettings>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl KaizenConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// Environment variables:
    /// - PORT: listen port (default: 8000)
    /// - KAIZEN_HOST: listen address (default: 0.0.0.0)
    /// - KAIZEN_UPLOAD_DIR: upload directory (default: uploads)
    /// - KAIZEN_PROVIDER_TIMEOUT_SECS: provider HTTP timeout (default: 120)
    /// - ANTHROPIC_API_KEY / ANTHROPIC_MODEL / ANTHROPIC_BASE_URL
    /// - OPENAI_API_KEY / OPENAI_MODEL / OPENAI_BASE_URL
    /// - KAIZEN_ENRICHMENT_API_KEY / KAIZEN_ENRICHMENT_URL
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_str = env_or("PORT", &DEFAULT_PORT.to_string());
        let port: u16 = port_str
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port_str))?;

        let host_str = env_or("KAIZEN_HOST", DEFAULT_HOST);
        let host: IpAddr = host_str
            .parse()
            .map_err(|_| ConfigError::InvalidHost(host_str))?;

        let timeout_str = env_or(
            "KAIZEN_PROVIDER_TIMEOUT_SECS",
            &DEFAULT_PROVIDER_TIMEOUT_SECS.to_string(),
        );
        let timeout_secs = timeout_str
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout(timeout_str))?;

        Ok(Self {
            bind: SocketAddr::new(host, port),
            upload_dir: PathBuf::from(env_or("KAIZEN_UPLOAD_DIR", DEFAULT_UPLOAD_DIR)),
            provider_timeout: Duration::from_secs(timeout_secs),
            anthropic: AnthropicProvider::settings_from_env(),
            openai: OpenAIProvider::settings_from_env(),
            enrichment: EnrichmentSettings::from_env(),
        })
    }

    /// Names of providers with credentials, in fallback order.
    pub fn configured_providers(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.anthropic.is_some() {
            names.push("anthropic");
        }
        if self.openai.is_some() {
            names.push("openai");
        }
        names
    }
}
