// ABOUTME: Ordered provider chain with single-attempt fallback between configured providers.
// ABOUTME: Builds the chain from provider settings and surfaces the last provider's failure.

use std::sync::Arc;
use std::time::Duration;

use kaizen_core::{PipelineError, ProviderError};

use crate::providers::{AnthropicProvider, OpenAIProvider, ProviderSettings, TextProvider};

/// Configured providers in priority order. Each call attempts them in order,
/// once each, and stops at the first success.
#[derive(Clone, Default)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn TextProvider>>,
}

impl ProviderChain {
    /// Create a chain from already-built providers, highest priority first.
    pub fn new(providers: Vec<Arc<dyn TextProvider>>) -> Self {
        Self { providers }
    }

    /// Build the standard chain: Anthropic first, OpenAI as fallback. Either
    /// may be absent; an empty chain is valid and fails every call.
    pub fn from_settings(
        anthropic: Option<&ProviderSettings>,
        openai: Option<&ProviderSettings>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let mut providers: Vec<Arc<dyn TextProvider>> = Vec::new();

        if let Some(settings) = anthropic {
            providers.push(Arc::new(AnthropicProvider::new(settings, timeout)?));
        }
        if let Some(settings) = openai {
            providers.push(Arc::new(OpenAIProvider::new(settings, timeout)?));
        }

        Ok(Self::new(providers))
    }

    /// Append a provider at the lowest priority.
    pub fn with_provider(mut self, provider: Arc<dyn TextProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Names of the configured providers, in attempt order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.provider_name()).collect()
    }

    /// Send the prompt to the first provider that answers.
    ///
    /// Fails with [`PipelineError::Configuration`] when no provider is
    /// configured. When every provider fails, the error of the last one
    /// attempted is returned.
    pub async fn generate(&self, prompt: &str, system: &str) -> Result<String, PipelineError> {
        let mut last_error = None;

        for provider in &self.providers {
            match provider.generate(prompt, system).await {
                Ok(text) => {
                    tracing::debug!(
                        provider = provider.provider_name(),
                        model = provider.model_name(),
                        chars = text.len(),
                        "provider replied"
                    );
                    return Ok(text);
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.provider_name(),
                        model = provider.model_name(),
                        error = %e,
                        "provider call failed"
                    );
                    last_error = Some(PipelineError::provider(provider.provider_name(), e));
                }
            }
        }

        Err(last_error.unwrap_or(PipelineError::Configuration))
    }
}
