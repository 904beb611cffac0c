//! API failure taxonomy and backend error-body parsing.
//!
//! Every outbound call resolves to either a typed payload or an [`ApiError`].
//! Failure bodies from the backend come in exactly two structured shapes,
//! a validation list (`{"detail": [{loc, msg, type}, ...]}`) or a generic
//! message (`{"message": "..."}`), so they are decoded with one
//! deterministic parse attempt into a tagged union instead of probing for
//! fields at runtime.

use serde::Deserialize;
use thiserror::Error;

/// Outcome of a rejected or failed API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 — the credential was missing, expired, or revoked server-side.
    #[error("authentication required")]
    Unauthorized,

    /// 403 — authenticated but not allowed. Session state is untouched.
    #[error("permission denied")]
    Forbidden,

    /// 404 — the requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// 5xx — the backend failed; nothing actionable client-side.
    #[error("server error (HTTP {status})")]
    Server { status: u16 },

    /// Other 4xx carrying a field-level validation list.
    #[error("validation failed: {}", summarize_fields(.errors))]
    Validation { errors: Vec<FieldError> },

    /// Other 4xx carrying a server-provided message (or none at all).
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// No response arrived: timeout, refused connection, or offline.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not match the expected payload type.
    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// Message suitable for a login form or inline display.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Invalid username or password".to_string(),
            other => other.to_string(),
        }
    }
}

/// One entry of a backend validation failure.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FieldError {
    /// Location path, e.g. `["body", "username"]`.
    pub loc: Vec<serde_json::Value>,
    /// Human-readable message.
    pub msg: String,
    /// Machine-readable kind.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Known backend failure-body shapes, decided by one parse attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// `{"detail": [{loc, msg, type}, ...]}`
    Validation(Vec<FieldError>),
    /// `{"message": "..."}`
    Generic(String),
    /// Empty, unparseable, or neither known shape.
    Empty,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawErrorBody {
    Validation { detail: Vec<FieldError> },
    Generic { message: String },
}

impl ErrorBody {
    /// Parse raw response bytes into a tagged error shape. Never fails:
    /// anything that matches neither known shape is `Empty`.
    pub fn parse(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<RawErrorBody>(bytes) {
            Ok(RawErrorBody::Validation { detail }) => ErrorBody::Validation(detail),
            Ok(RawErrorBody::Generic { message }) => ErrorBody::Generic(message),
            Err(_) => ErrorBody::Empty,
        }
    }

    /// Convert into the error for a non-special 4xx status.
    pub fn into_rejection(self, status: u16) -> ApiError {
        match self {
            ErrorBody::Validation(errors) => ApiError::Validation { errors },
            ErrorBody::Generic(message) => ApiError::Rejected { status, message },
            ErrorBody::Empty => ApiError::Rejected {
                status,
                message: format!("Request failed (HTTP {status})"),
            },
        }
    }
}

fn summarize_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.msg.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_validation_shape() {
        let body = br#"{"detail":[{"loc":["body","username"],"msg":"field required","type":"value_error.missing"}]}"#;
        match ErrorBody::parse(body) {
            ErrorBody::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].msg, "field required");
                assert_eq!(errors[0].kind, "value_error.missing");
            }
            other => panic!("expected validation shape, got {other:?}"),
        }
    }

    #[test]
    fn parses_generic_shape() {
        let body = br#"{"message":"account disabled"}"#;
        assert_eq!(
            ErrorBody::parse(body),
            ErrorBody::Generic("account disabled".into())
        );
    }

    #[test]
    fn garbage_and_empty_are_empty() {
        assert_eq!(ErrorBody::parse(b""), ErrorBody::Empty);
        assert_eq!(ErrorBody::parse(b"<html>502</html>"), ErrorBody::Empty);
        assert_eq!(ErrorBody::parse(br#"{"code":500}"#), ErrorBody::Empty);
    }

    #[test]
    fn rejection_carries_server_message() {
        let err = ErrorBody::Generic("account disabled".into()).into_rejection(400);
        match err {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "account disabled");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_rejection_has_fallback_message() {
        match ErrorBody::Empty.into_rejection(418) {
            ApiError::Rejected { message, .. } => assert!(message.contains("418")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn validation_display_joins_messages() {
        let err = ApiError::Validation {
            errors: vec![
                FieldError {
                    loc: vec!["body".into(), "username".into()],
                    msg: "field required".into(),
                    kind: "value_error.missing".into(),
                },
                FieldError {
                    loc: vec!["body".into(), "password".into()],
                    msg: "too short".into(),
                    kind: "value_error".into(),
                },
            ],
        };
        let rendered = err.to_string();
        assert!(rendered.contains("field required"));
        assert!(rendered.contains("too short"));
    }

    #[test]
    fn unauthorized_user_message_reads_as_form_error() {
        assert_eq!(
            ApiError::Unauthorized.user_message(),
            "Invalid username or password"
        );
    }
}
