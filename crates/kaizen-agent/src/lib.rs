// ABOUTME: LLM side of kaizen: provider adapters, prompt builders, the response normalizer, and pipelines.
// ABOUTME: Exposes the Pipeline used by the HTTP layer plus the pieces it is assembled from.

pub mod client;
pub mod enrich;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod testing;

pub use client::ProviderChain;
pub use enrich::{
    CapitalizedWordHint, CompanyLookup, EnrichmentSettings, Enricher, HttpCompanyLookup,
    LookupError, NameHintStrategy,
};
pub use normalize::{extract_payload, find_fenced_block, normalize};
pub use pipeline::Pipeline;
pub use prompts::Prompt;
pub use providers::{AnthropicProvider, OpenAIProvider, ProviderSettings, TextProvider};
