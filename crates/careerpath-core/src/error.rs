//! Error types and backend error-message extraction.
//!
//! Backend failures are surfaced as a single human-readable message. There is
//! no retry and no distinction between transient and permanent failures.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when talking to the careerpath backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred before a response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// The response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build an [`ApiError::Http`] from a raw error body, falling back to
    /// `fallback` when no message can be extracted.
    pub fn from_response(status: u16, body: &str, fallback: &str) -> Self {
        let message = extract_error_message(body).unwrap_or_else(|| fallback.to_string());
        ApiError::Http { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Keys checked, in order, for a message in an error body.
const MESSAGE_KEYS: [&str; 3] = ["error", "detail", "message"];

/// Longest plain-text body that is shown as-is.
const MAX_PLAIN_BODY: usize = 200;

/// Pull a human-readable message out of an error response body.
///
/// JSON bodies are searched for `error`, `detail` then `message`. A string
/// value is used directly and a list of strings is joined. A short non-JSON
/// body (not HTML) is returned trimmed. Anything else yields `None`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => MESSAGE_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(message_from_value),
        Ok(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Ok(value @ Value::Array(_)) => message_from_value(&value),
        Ok(_) => None,
        Err(_) => {
            if trimmed.len() <= MAX_PLAIN_BODY && !trimmed.starts_with('<') {
                Some(trimmed.to_string())
            } else {
                None
            }
        }
    }
}

fn message_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" "))
            }
        }
        _ => None,
    }
}

/// Local validation failures for question and recommendation drafts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("option {0} needs a label")]
    EmptyOptionLabel(usize),

    #[error("step {0} needs a title")]
    EmptyStepTitle(usize),

    #[error("a question needs at least {min} options, found {found}")]
    TooFewOptions { min: usize, found: usize },

    #[error("a recommendation needs at least one roadmap step")]
    NoSteps,

    #[error("no entry at position {index} (draft has {len})")]
    OutOfRange { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_error_then_detail_then_message() {
        let body = r#"{"message": "m", "detail": "d", "error": "e"}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("e"));

        let body = r#"{"message": "m", "detail": "d"}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("d"));

        let body = r#"{"message": "Only admins may assign tests."}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Only admins may assign tests.")
        );
    }

    #[test]
    fn skips_non_string_values() {
        let body = r#"{"error": 42, "detail": "Not found."}"#;
        assert_eq!(extract_error_message(body).as_deref(), Some("Not found."));
    }

    #[test]
    fn joins_string_lists() {
        let body = r#"{"detail": ["Test already assigned.", "Questions are locked."]}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Test already assigned. Questions are locked.")
        );
    }

    #[test]
    fn plain_text_and_html_bodies() {
        assert_eq!(
            extract_error_message("Bad Gateway\n").as_deref(),
            Some("Bad Gateway")
        );
        assert_eq!(
            extract_error_message("<html><body>Server Error</body></html>"),
            None
        );
        assert_eq!(extract_error_message("   "), None);
    }

    #[test]
    fn unrecognized_json_shape_yields_none() {
        assert_eq!(extract_error_message(r#"{"status": "error"}"#), None);
        assert_eq!(extract_error_message("null"), None);
    }

    #[test]
    fn from_response_uses_fallback() {
        let err = ApiError::from_response(500, "{}", "Unable to load test requests.");
        assert_eq!(err.to_string(), "Unable to load test requests.");
        assert_eq!(err.status(), Some(500));

        let err = ApiError::from_response(403, r#"{"detail": "Forbidden."}"#, "fallback");
        assert_eq!(err.to_string(), "Forbidden.");
    }
}
