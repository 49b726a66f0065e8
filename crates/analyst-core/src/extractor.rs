//! Recovery of the JSON object embedded in provider text
//!
//! Providers are asked for bare JSON but routinely wrap it in a markdown code
//! fence. Extraction is deliberately narrow: either the whole object parses or
//! the call fails with [`AnalysisError::PayloadParse`]. No partial objects are
//! ever produced.

use crate::config::ExtractionMode;
use crate::error::{AnalysisError, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

static OPENING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^```[A-Za-z0-9_+.-]*[ \t]*(?:\r?\n)?").expect("opening fence pattern is valid")
});

static CLOSING_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\r?\n)?[ \t]*```$").expect("closing fence pattern is valid")
});

/// Turns raw provider text into a parsed JSON object
pub trait PayloadExtractor: Send + Sync + std::fmt::Debug {
    /// Extract the JSON object from `raw`
    fn extract(&self, raw: &str) -> Result<Value>;
}

/// Build the extractor for a configured mode
pub fn extractor_for(mode: ExtractionMode) -> Box<dyn PayloadExtractor> {
    match mode {
        ExtractionMode::Fenced => Box::new(FencedExtractor),
        ExtractionMode::Balanced => Box::new(BalancedExtractor),
    }
}

/// Remove one leading and one trailing code fence, trimming whitespace
pub fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = OPENING_FENCE
        .find(trimmed)
        .map_or(trimmed, |m| &trimmed[m.end()..]);
    let without_close = CLOSING_FENCE
        .find(without_open)
        .map_or(without_open, |m| &without_open[..m.start()]);
    without_close.trim()
}

fn parse_object(candidate: &str, raw: &str) -> Result<Value> {
    let value: Value =
        serde_json::from_str(candidate).map_err(|e| AnalysisError::parse(e.to_string(), raw))?;

    if value.is_object() {
        Ok(value)
    } else {
        Err(AnalysisError::parse(
            format!("expected a JSON object, found {}", kind(&value)),
            raw,
        ))
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Fence stripping followed by a strict parse
#[derive(Debug, Clone, Copy, Default)]
pub struct FencedExtractor;

impl PayloadExtractor for FencedExtractor {
    fn extract(&self, raw: &str) -> Result<Value> {
        let candidate = strip_fences(raw);
        debug!(raw_len = raw.len(), candidate_len = candidate.len(), "Extracting fenced payload");
        parse_object(candidate, raw)
    }
}

/// Fenced extraction with a fallback scan for a balanced object
///
/// Handles responses where the model adds prose before or after the JSON.
/// Each `{` is tried in order until a balanced span parses as an object.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancedExtractor;

impl PayloadExtractor for BalancedExtractor {
    fn extract(&self, raw: &str) -> Result<Value> {
        let first_error = match FencedExtractor.extract(raw) {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        for (start, _) in raw.match_indices('{') {
            let Some(candidate) = balanced_span(&raw[start..]) else {
                continue;
            };
            let parsed = serde_json::from_str::<Value>(candidate).ok();
            if let Some(value) = parsed.filter(Value::is_object) {
                debug!(
                    offset = start,
                    candidate_len = candidate.len(),
                    "Recovered payload with balanced object scan"
                );
                return Ok(value);
            }
        }
        Err(first_error)
    }
}

/// The `{...}` prefix of `s` whose braces balance, ignoring braces in strings
///
/// `s` must start with `{`.
fn balanced_span(s: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=offset]);
                }
            }
            _ => {}
        }
    }
    None
}
