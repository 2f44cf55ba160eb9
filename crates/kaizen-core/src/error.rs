// ABOUTME: Error taxonomy for the provider-call-and-normalize pipeline.
// ABOUTME: ProviderError classifies a single provider attempt; PipelineError is what callers see.

use thiserror::Error;

/// Why a single provider call failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// `hint` names the credential to check; `body` is the provider's reply.
    #[error("unauthorized ({hint}): {body}")]
    Unauthorized { hint: String, body: String },

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Failures surfaced by the pipeline to its callers.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No LLM API key configured")]
    Configuration,

    #[error("{provider} API error: {source}")]
    ProviderCall {
        provider: String,
        #[source]
        source: ProviderError,
    },

    #[error("Failed to parse LLM response: {0}")]
    MalformedResponse(String),

    #[error("LLM response did not match the expected schema: {0}")]
    SchemaValidation(String),
}

impl PipelineError {
    pub fn provider(provider: impl Into<String>, source: ProviderError) -> Self {
        Self::ProviderCall {
            provider: provider.into(),
            source,
        }
    }

    /// Short machine-friendly label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::ProviderCall { .. } => "provider_call",
            Self::MalformedResponse(_) => "malformed_response",
            Self::SchemaValidation(_) => "schema_validation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_call_message_names_provider_and_cause() {
        let err = PipelineError::provider(
            "openai",
            ProviderError::Status {
                status: 503,
                body: "overloaded".to_string(),
            },
        );
        let msg = err.to_string();
        assert!(msg.starts_with("openai API error"), "got: {}", msg);
        assert!(msg.contains("503"));
        assert!(msg.contains("overloaded"));
        assert_eq!(err.kind(), "provider_call");
    }

    #[test]
    fn error_display() {
        let errors = vec![
            PipelineError::Configuration,
            PipelineError::MalformedResponse("EOF while parsing".to_string()),
            PipelineError::SchemaValidation("missing field `title`".to_string()),
            PipelineError::provider(
                "anthropic",
                ProviderError::RateLimited("quota exceeded".to_string()),
            ),
        ];

        for err in &errors {
            assert!(!err.to_string().is_empty());
        }

        assert!(
            PipelineError::MalformedResponse("EOF while parsing".to_string())
                .to_string()
                .contains("EOF while parsing")
        );
    }
}
