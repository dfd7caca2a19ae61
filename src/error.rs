//! API Errors
//!
//! Failure taxonomy for calls against the NTU-CODER backend.

use thiserror::Error;

/// Result alias for backend calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the API client.
///
/// Cloneable so one in-flight request can hand the same failure to every
/// caller that joined it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Transport failure (offline, CORS, aborted by the browser)
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx response other than 401
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Status { status: u16, message: Option<String> },
    /// 401 from the backend; the session has been torn down
    #[error("session expired or not signed in")]
    Unauthorized,
    /// Response body did not match the expected shape
    #[error("invalid response: {0}")]
    Decode(String),
    /// Superseded by a newer request for the same view
    #[error("request cancelled")]
    Cancelled,
    /// Feature not configured for this deployment
    #[error("not configured: {0}")]
    Config(String),
}

impl ApiError {
    /// Transport failures and 5xx are worth one automatic retry
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Message supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message: Some(m), .. } if !m.trim().is_empty() => Some(m.as_str()),
            _ => None,
        }
    }

    /// Text for an error toast: the server's message, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

/// Longest plain-text body shown to the user
const MAX_PLAIN_MESSAGE: usize = 200;

/// Pull a human-readable message out of an error body.
///
/// The backend uses `message`; framework-generated errors use `title` or
/// `error`. Short plain-text bodies are used as-is; markup (a proxy's error
/// page) and long bodies are not.
pub fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => ["message", "title", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string),
        Ok(serde_json::Value::String(s)) => Some(s),
        Ok(_) => None,
        Err(_) if trimmed.chars().count() <= MAX_PLAIN_MESSAGE && !trimmed.contains('<') => {
            Some(trimmed.to_string())
        }
        Err(_) => None,
    }
}
