//! # Input Validation
//!
//! Free-text fields are trimmed and length bounded; identifiers must be
//! strictly positive numbers. Validation never touches the store.
//!
//! Lengths count Unicode scalar values, not bytes.

use serde_json::{Map, Value};
use thiserror::Error;

/// Maximum title length after trimming
pub const TITLE_MAX_CHARS: usize = 200;
/// Maximum body length after trimming
pub const BODY_MAX_CHARS: usize = 10_000;
/// Maximum search term length after trimming
pub const SEARCH_MAX_CHARS: usize = 100;

/// Rejected client input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required and must be less than 200 characters")]
    Title,

    #[error("Invalid ID")]
    Id,
}

/// Validated title and body for create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteInput {
    pub title: String,
    pub body: String,
}

impl NoteInput {
    /// Validate `title` and `body` from a request object.
    ///
    /// The title is required. An invalid or missing body becomes `""`.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, ValidationError> {
        let title = sanitize_text(fields.get("title"), TITLE_MAX_CHARS).ok_or(ValidationError::Title)?;
        let body = sanitize_text(fields.get("body"), BODY_MAX_CHARS).unwrap_or_default();
        Ok(Self { title, body })
    }
}

/// Trim a text value and bound its length.
///
/// Returns `None` for non-strings, for values that are empty after
/// trimming, and for values longer than `max_chars`.
pub fn sanitize_text(value: Option<&Value>, max_chars: usize) -> Option<String> {
    let trimmed = value?.as_str()?.trim();
    if trimmed.is_empty() || trimmed.chars().count() > max_chars {
        return None;
    }
    Some(trimmed.to_string())
}

/// Validate a search term; invalid terms mean "no filter"
pub fn sanitize_search(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed.chars().count() > SEARCH_MAX_CHARS {
        return None;
    }
    Some(trimmed.to_string())
}

/// Validate a note id from a JSON number or numeric string.
///
/// Fractional values are truncated toward zero; the result must be at
/// least 1.
pub fn validate_id(value: Option<&Value>) -> Result<i64, ValidationError> {
    let id = match value {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Some(i),
            None => n.as_f64().and_then(truncate_positive),
        },
        Some(Value::String(s)) => parse_numeric(s),
        _ => None,
    };

    match id {
        Some(id) if id >= 1 => Ok(id),
        _ => Err(ValidationError::Id),
    }
}

fn parse_numeric(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    s.parse::<f64>().ok().and_then(truncate_positive)
}

fn truncate_positive(f: f64) -> Option<i64> {
    if !f.is_finite() || f <= 0.0 || f >= i64::MAX as f64 {
        return None;
    }
    Some(f.trunc() as i64)
}
