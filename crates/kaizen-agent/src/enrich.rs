// ABOUTME: Best-effort company enrichment for the analysis prompt.
// ABOUTME: Guesses a company name from the description, looks it up over HTTP, and never fails the request.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kaizen_core::CompanyFacts;
use thiserror::Error;

use crate::providers::non_empty_env;

pub const DEFAULT_ENRICHMENT_URL: &str = "https://api.companyenrich.com";

/// Enrichment lookups give up after this long.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from a company lookup. Never surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup request failed: {0}")]
    Request(String),

    #[error("lookup returned status {0}")]
    Status(u16),

    #[error("lookup returned an unreadable body: {0}")]
    Decode(String),
}

/// Picks the string used to query the enrichment service.
pub trait NameHintStrategy: Send + Sync {
    fn company_name_hint(&self, description: &str) -> Option<String>;
}

/// Takes the first whitespace-separated word that starts with an uppercase
/// letter and is longer than three characters.
///
/// Low precision: "Tokyo logistics company" yields "Tokyo". Swap in another
/// strategy rather than tuning this one.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapitalizedWordHint;

impl NameHintStrategy for CapitalizedWordHint {
    fn company_name_hint(&self, description: &str) -> Option<String> {
        description
            .split_whitespace()
            .find(|word| {
                word.chars().next().is_some_and(char::is_uppercase) && word.chars().count() > 3
            })
            .map(str::to_string)
    }
}

/// A source of public company facts.
#[async_trait]
pub trait CompanyLookup: Send + Sync {
    /// `Ok(None)` means the source has no record for the hint.
    async fn lookup(&self, name_hint: &str) -> Result<Option<CompanyFacts>, LookupError>;
}

/// Credentials and endpoint for the HTTP enrichment service.
#[derive(Clone, PartialEq, Eq)]
pub struct EnrichmentSettings {
    pub api_key: String,
    pub base_url: String,
}

impl fmt::Debug for EnrichmentSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichmentSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl EnrichmentSettings {
    /// Read `KAIZEN_ENRICHMENT_API_KEY` and `KAIZEN_ENRICHMENT_URL`. Returns
    /// `None` (enrichment disabled) when the key is unset or blank.
    pub fn from_env() -> Option<Self> {
        let api_key = non_empty_env("KAIZEN_ENRICHMENT_API_KEY")?;
        let base_url = non_empty_env("KAIZEN_ENRICHMENT_URL")
            .unwrap_or_else(|| DEFAULT_ENRICHMENT_URL.to_string());
        Some(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Looks companies up with `GET {base_url}/companies?name=<hint>`.
pub struct HttpCompanyLookup {
    client: reqwest::Client,
    settings: EnrichmentSettings,
}

impl HttpCompanyLookup {
    pub fn new(settings: EnrichmentSettings) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .map_err(|e| LookupError::Request(e.to_string()))?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl CompanyLookup for HttpCompanyLookup {
    async fn lookup(&self, name_hint: &str) -> Result<Option<CompanyFacts>, LookupError> {
        let url = format!("{}/companies", self.settings.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("name", name_hint)])
            .bearer_auth(&self.settings.api_key)
            .send()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let facts: CompanyFacts = response
            .json()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))?;

        Ok(Some(facts).filter(|f| !f.is_empty()))
    }
}

/// Pairs a hint strategy with a lookup and swallows every failure.
#[derive(Clone)]
pub struct Enricher {
    strategy: Arc<dyn NameHintStrategy>,
    lookup: Arc<dyn CompanyLookup>,
}

impl Enricher {
    /// Use the default [`CapitalizedWordHint`] strategy.
    pub fn new(lookup: Arc<dyn CompanyLookup>) -> Self {
        Self::with_strategy(Arc::new(CapitalizedWordHint), lookup)
    }

    pub fn with_strategy(
        strategy: Arc<dyn NameHintStrategy>,
        lookup: Arc<dyn CompanyLookup>,
    ) -> Self {
        Self { strategy, lookup }
    }

    /// Facts for the company described, or `None` when there is no hint, no
    /// record, or the lookup failed.
    pub async fn enrich(&self, description: &str) -> Option<CompanyFacts> {
        let hint = self.strategy.company_name_hint(description)?;

        match self.lookup.lookup(&hint).await {
            Ok(Some(facts)) => {
                tracing::debug!(hint = %hint, "enrichment data found");
                Some(facts)
            }
            Ok(None) => {
                tracing::debug!(hint = %hint, "no enrichment data");
                None
            }
            Err(e) => {
                tracing::warn!(
                    hint = %hint,
                    error = %e,
                    "enrichment lookup failed, continuing without it"
                );
                None
            }
        }
    }
}
