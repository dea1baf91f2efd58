//! Client error taxonomy.
//!
//! Every failure a view can surface resolves to one [`ApiError`]. None of them is
//! retried automatically and none is fatal to the application.

use serde_json::Value;
use thiserror::Error;

/// Suffix appended when the server answers with an HTML page instead of JSON.
pub const HTML_BODY_HINT: &str =
    "Server returned HTML instead of JSON. Restart backend and run migrations.";

/// Field-error keys checked, in order, when a non-2xx body has no `error` string.
const FIELD_ERROR_KEYS: [&str; 4] = ["email", "password", "phone", "full_name"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Transport failure: the request never produced an HTTP response.
    #[error("Unable to reach the server: {0}")]
    Network(String),
    /// Non-2xx response carrying (or defaulting to) a message.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// Response body could not be decoded.
    #[error("{0}")]
    MalformedBody(String),
    /// Client-side validation failed before any request was sent.
    #[error("{0}")]
    Validation(String),
    /// Third-party checkout widget could not be used.
    #[error("{0}")]
    Checkout(String),
    /// Request could not be serialized.
    #[error("Unable to encode request: {0}")]
    Encoding(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout(message.into())
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the error was raised before anything went over the wire.
    pub fn is_client_side(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Encoding(_))
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Pulls the user-facing message out of a structured error body.
pub fn extract_error_message(body: &Value) -> Option<String> {
    let non_empty = |value: &Value| {
        value
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    if let Some(message) = body.get("error").and_then(non_empty) {
        return Some(message);
    }

    for key in FIELD_ERROR_KEYS {
        let first = body
            .get(key)
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .and_then(non_empty);
        if first.is_some() {
            return first;
        }
    }

    body.get("detail").and_then(non_empty)
}

/// Parses a raw response body into JSON.
///
/// Empty bodies read as `{}`. Bodies that start with markup are reported with
/// [`HTML_BODY_HINT`] so the user knows the backend, not the page, is broken.
pub fn parse_body(raw: &str, fallback: &str) -> ApiResult<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_str(raw).map_err(|_| {
        if raw.trim_start().starts_with('<') {
            ApiError::MalformedBody(format!("{fallback}. {HTML_BODY_HINT}"))
        } else {
            ApiError::MalformedBody(fallback.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_key_wins() {
        let body = json!({"error": "Invalid OTP", "detail": "ignored"});
        assert_eq!(extract_error_message(&body).as_deref(), Some("Invalid OTP"));
    }

    #[test]
    fn test_field_errors_in_order() {
        let body = json!({
            "phone": ["Enter a valid phone"],
            "password": ["Too short"],
        });
        assert_eq!(extract_error_message(&body).as_deref(), Some("Too short"));
    }

    #[test]
    fn test_detail_used_last() {
        let body = json!({"detail": "Not authenticated"});
        assert_eq!(
            extract_error_message(&body).as_deref(),
            Some("Not authenticated")
        );
        assert_eq!(extract_error_message(&json!({"error": "  "})), None);
    }

    #[test]
    fn test_html_body_is_rewritten() {
        let err = parse_body("<!DOCTYPE html><html></html>", "Unable to load orders").unwrap_err();
        assert_eq!(
            err,
            ApiError::MalformedBody(format!("Unable to load orders. {HTML_BODY_HINT}"))
        );
    }

    #[test]
    fn test_garbage_body_uses_fallback() {
        let err = parse_body("oops", "Login failed").unwrap_err();
        assert_eq!(err.to_string(), "Login failed");
    }

    #[test]
    fn test_empty_body_is_empty_object() {
        assert_eq!(parse_body("  ", "x").unwrap(), json!({}));
    }

    #[test]
    fn test_client_side_errors() {
        assert!(ApiError::validation("x").is_client_side());
        assert!(!ApiError::Network("down".into()).is_client_side());
        assert_eq!(
            ApiError::Status {
                status: 404,
                message: "User not found".into()
            }
            .status_code(),
            Some(404)
        );
    }
}
