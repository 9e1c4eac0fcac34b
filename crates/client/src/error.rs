use std::borrow::Cow;

use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;

/// Failure of an API call, as observed by the caller.
///
/// A non-2xx response keeps its status and body exactly as the server sent
/// them, so feature code can render field-level validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("API error ({status}): {}", String::from_utf8_lossy(.body))]
    Status { status: StatusCode, body: Bytes },

    /// The exchange failed on the wire. `status` is set when the response
    /// head arrived but its body could not be read.
    #[error("network error: {reason}")]
    Transport {
        status: Option<StatusCode>,
        reason: String,
    },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    #[error("request could not be built: {0}")]
    Build(String),

    #[error("session credential cannot be sent as a header")]
    InvalidCredential,
}

impl ApiError {
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// The session credential was missing, invalid or expired.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Raw error body, byte-for-byte as received.
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            ApiError::Status { body, .. } => Some(&body[..]),
            _ => None,
        }
    }

    /// Error body for display; invalid UTF-8 is replaced.
    pub fn body_text(&self) -> Option<Cow<'_, str>> {
        self.body().map(String::from_utf8_lossy)
    }

    /// Error body as JSON (e.g. `{"amount": ["must be positive"]}`), if it is
    /// a JSON object.
    pub fn field_errors(&self) -> Option<serde_json::Map<String, serde_json::Value>> {
        match serde_json::from_slice(self.body()?) {
            Ok(serde_json::Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}
