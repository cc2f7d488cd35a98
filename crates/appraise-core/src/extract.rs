//! Isolates the JSON payload in raw generation output.

use crate::errors::MalformedOutputError;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    /// Opening fence with optional info string, e.g. "```json".
    static ref OPEN_FENCE: Regex = Regex::new(r"^```[\w-]*[ \t]*\r?\n?").unwrap();
    static ref CLOSE_FENCE: Regex = Regex::new(r"\r?\n?```\s*$").unwrap();
}

pub fn strip_code_fence(text: &str) -> &str {
    if !text.starts_with("```") {
        return text;
    }
    let body = match OPEN_FENCE.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    };
    let body = match CLOSE_FENCE.find(body) {
        Some(m) => &body[..m.start()],
        None => body,
    };
    body.trim()
}

/// Substring from the first `{` to the last `}` inclusive.
pub fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

pub fn extract_json(raw: &str) -> Result<Value, MalformedOutputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MalformedOutputError::new("empty output", raw));
    }
    let body = strip_code_fence(trimmed);

    let candidate = outermost_object(body)
        .ok_or_else(|| MalformedOutputError::new("no JSON object found in output", raw))?;
    serde_json::from_str::<Value>(candidate)
        .map_err(|e| MalformedOutputError::new(format!("invalid JSON object: {}", e), raw))
}
