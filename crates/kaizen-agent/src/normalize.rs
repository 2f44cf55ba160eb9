// ABOUTME: Response normalizer turning raw provider text into a validated, strongly-typed result.
// ABOUTME: Locates the first fenced block with a linear scan, parses JSON, then coerces and validates.

use kaizen_core::{PipelineError, Validate};
use serde::de::DeserializeOwned;

const FENCE: &str = "```";

/// A fenced region found in provider text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FencedBlock<'a> {
    /// Language tag directly after the opening fence; empty when untagged.
    pub language: &'a str,
    /// Text between the tag and the closing fence (or end of input when the
    /// fence is never closed).
    pub body: &'a str,
}

impl FencedBlock<'_> {
    pub fn is_json(&self) -> bool {
        self.language.eq_ignore_ascii_case("json")
    }
}

/// Find the fenced block to extract from `text` in a single left-to-right pass.
///
/// The first `json`-tagged block wins. Without one, the first block of any
/// tag is returned. A closing fence is never treated as an opener, so text
/// between two blocks is not mistaken for a block.
pub fn find_fenced_block(text: &str) -> Option<FencedBlock<'_>> {
    let mut first: Option<FencedBlock<'_>> = None;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(FENCE) {
        let tag_start = cursor + offset + FENCE.len();
        let tag_len = text[tag_start..]
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(text.len() - tag_start);
        let body_start = tag_start + tag_len;

        let (body_end, next) = match text[body_start..].find(FENCE) {
            Some(close) => (body_start + close, body_start + close + FENCE.len()),
            None => (text.len(), text.len()),
        };

        let block = FencedBlock {
            language: &text[tag_start..body_start],
            body: &text[body_start..body_end],
        };
        if block.is_json() {
            return Some(block);
        }
        first.get_or_insert(block);
        cursor = next;
    }

    first
}

/// The part of `text` that should hold the JSON document, trimmed.
pub fn extract_payload(text: &str) -> &str {
    match find_fenced_block(text) {
        Some(block) => block.body.trim(),
        None => text.trim(),
    }
}

/// Parse provider text into `T`.
///
/// Fence extraction or JSON syntax problems yield
/// [`PipelineError::MalformedResponse`]; missing or mistyped fields and
/// [`Validate`] failures yield [`PipelineError::SchemaValidation`]. Unknown
/// fields are ignored.
pub fn normalize<T>(raw_text: &str) -> Result<T, PipelineError>
where
    T: DeserializeOwned + Validate,
{
    let payload = extract_payload(raw_text);
    if payload.is_empty() {
        return Err(PipelineError::MalformedResponse(
            "response contained no JSON payload".to_string(),
        ));
    }

    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| PipelineError::MalformedResponse(e.to_string()))?;

    let parsed: T = serde_json::from_value(value)
        .map_err(|e| PipelineError::SchemaValidation(e.to_string()))?;

    parsed.validate().map_err(PipelineError::SchemaValidation)?;

    Ok(parsed)
}
