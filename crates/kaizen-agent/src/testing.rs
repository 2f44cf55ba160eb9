// ABOUTME: Test utilities for kaizen-agent, including a scripted stub text provider.
// ABOUTME: Used in unit and HTTP tests to simulate provider replies without real API calls.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use kaizen_core::ProviderError;

use crate::providers::TextProvider;

/// A stub provider that answers calls from a pre-configured script and
/// records what it was asked. Once the script runs out, the last outcome
/// repeats.
#[derive(Debug)]
pub struct StubProvider {
    name: String,
    script: Vec<Result<String, ProviderError>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<(String, String)>>,
}

impl StubProvider {
    /// Create a stub that always replies with `text`.
    pub fn replying(name: &str, text: &str) -> Self {
        Self::with_outcome(name, Ok(text.to_owned()))
    }

    /// Create a stub that always fails with `error`.
    pub fn failing(name: &str, error: ProviderError) -> Self {
        Self::with_outcome(name, Err(error))
    }

    /// Create a stub that replies with each of `replies` in turn.
    pub fn scripted(name: &str, replies: &[&str]) -> Self {
        Self::with_script(name, replies.iter().map(|r| Ok((*r).to_owned())).collect())
    }

    fn with_outcome(name: &str, outcome: Result<String, ProviderError>) -> Self {
        Self::with_script(name, vec![outcome])
    }

    fn with_script(name: &str, script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            name: name.to_owned(),
            script,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Number of times `generate` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The `(prompt, system)` pair of the most recent call.
    pub fn last_request(&self) -> Option<(String, String)> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for StubProvider {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some((prompt.to_owned(), system.to_owned()));
        }
        match self.script.get(call).or_else(|| self.script.last()) {
            Some(outcome) => outcome.clone(),
            None => Err(ProviderError::InvalidResponse("stub has no script".to_owned())),
        }
    }

    fn provider_name(&self) -> &str {
        &self.name
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}
