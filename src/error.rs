//! Errors surfaced by the REST client.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never produced a response (DNS, connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("not signed in or session expired: {0}")]
    Unauthorized(String),

    #[error("permission denied: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// 400 or 422.
    #[error("validation failed: {message}")]
    Validation { status: u16, message: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Conflict(_) => Some(409),
            ApiError::Validation { status, .. } | ApiError::Status { status, .. } => {
                Some(*status)
            }
            ApiError::Decode(_) => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MessageField {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<MessageField>,
    error: Option<String>,
}

/// Pull a human readable message out of an error response body.
pub fn error_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        match parsed.message {
            Some(MessageField::One(msg)) if !msg.is_empty() => return msg,
            Some(MessageField::Many(msgs)) if !msgs.is_empty() => return msgs.join("; "),
            _ => {}
        }
        if let Some(err) = parsed.error.filter(|e| !e.is_empty()) {
            return err;
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("request failed")
        .to_string()
}

/// Map a non-2xx response onto an `ApiError`.
pub fn error_for_status(status: u16, body: &str) -> ApiError {
    let message = error_message(status, body);
    match status {
        401 => ApiError::Unauthorized(message),
        403 => ApiError::Forbidden(message),
        404 => ApiError::NotFound(message),
        400 | 422 => ApiError::Validation { status, message },
        409 => ApiError::Conflict(message),
        _ => ApiError::Status { status, message },
    }
}
