//! Custom error types for the common library
//!
//! Every failure that reaches a caller is converted into [`ApiError`], which
//! always carries a message that can be shown to the user as-is.

use serde_json::Value;
use thiserror::Error;

use crate::validation::ValidationError;

/// Message used when the backend sends an empty `detail` array
pub const GENERIC_DETAIL_MESSAGE: &str = "Ошибка";

/// Message used when nothing more specific can be extracted
pub const UNKNOWN_ERROR_MESSAGE: &str = "Неизвестная ошибка";

/// Message shown when an action needs a signed-in user
pub const SIGN_IN_REQUIRED_MESSAGE: &str = "Войдите, чтобы продолжить";

/// Message shown when the same action is still waiting for the backend
pub const ACTION_PENDING_MESSAGE: &str = "Подождите, предыдущее действие ещё выполняется";

/// Custom error type for client operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Local field validation failed, nothing was sent
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// 401 from the backend
    #[error("{0}")]
    Unauthorized(String),

    /// 403 from the backend
    #[error("{0}")]
    Forbidden(String),

    /// 404 from the backend
    #[error("{0}")]
    NotFound(String),

    /// Any other 4xx, including backend validation errors
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// 5xx from the backend
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The request never produced a response
    #[error("{0}")]
    Transport(String),

    /// The response body did not have the expected shape
    #[error("{0}")]
    Decode(String),

    /// The operation requires an authenticated session
    #[error("{}", SIGN_IN_REQUIRED_MESSAGE)]
    Unauthenticated,

    /// The same action is already waiting for the backend
    #[error("{}", ACTION_PENDING_MESSAGE)]
    ActionPending,

    /// The session token could not be persisted
    #[error("{0}")]
    Storage(String),
}

impl ApiError {
    /// Classify a non-success HTTP response
    pub fn from_response(status: u16, body: Option<&Value>) -> Self {
        let fallback = format!("Request failed with status code {}", status);
        let message = extract_error(body, Some(&fallback));

        match status {
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            400..=499 => ApiError::Rejected { status, message },
            _ => ApiError::Server { status, message },
        }
    }

    /// Wrap an error raised before any response was received
    pub fn transport(err: impl std::fmt::Display) -> Self {
        ApiError::Transport(extract_error(None, Some(&err.to_string())))
    }

    /// HTTP status behind this error, if the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Rejected { status, .. } | ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The message to display for this error
    pub fn ui_message(&self) -> String {
        self.to_string()
    }
}

/// Extract a single human-readable message from an error payload.
///
/// Preference order: a `detail` string, the first `detail[].msg`, a
/// `message` string, the transport error's own message, and finally a
/// generic fallback.
pub fn extract_error(body: Option<&Value>, transport: Option<&str>) -> String {
    if let Some(data) = body.filter(|data| !data.is_null()) {
        match data.get("detail") {
            Some(Value::String(detail)) => return detail.clone(),
            Some(Value::Array(items)) => {
                return items
                    .first()
                    .and_then(|item| item.get("msg"))
                    .and_then(Value::as_str)
                    .filter(|msg| !msg.is_empty())
                    .unwrap_or(GENERIC_DETAIL_MESSAGE)
                    .to_string();
            }
            _ => {}
        }

        if let Some(message) = data.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }

    match transport {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => UNKNOWN_ERROR_MESSAGE.to_string(),
    }
}

/// Type alias for client results
pub type ApiResult<T> = Result<T, ApiError>;
