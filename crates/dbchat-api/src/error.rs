//! Structured errors for backend requests.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category of a backend request failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// HTTP status error (4xx, 5xx)
    HttpStatus,
    /// Network-level failure (connect, timeout, broken stream)
    Network,
    /// Failed to parse a response body
    Parse,
    /// The response carried no body where one was required
    EmptyBody,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Parse => write!(f, "parse"),
            ApiErrorKind::EmptyBody => write!(f, "empty_body"),
        }
    }
}

/// Structured error from the backend with kind and details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// HTTP status code, when the failure is a status error
    pub status: Option<u16>,
    /// Optional additional details (e.g., raw error body)
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new error.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            details: None,
        }
    }

    /// Creates an HTTP status error.
    ///
    /// If the body is JSON with an `error` field, its message is folded into
    /// the summary so the chat bubble shows something readable.
    pub fn http_status(status: u16, body: &str) -> Self {
        let message;
        let details;
        if body.is_empty() {
            message = format!("HTTP {status}");
            details = None;
        } else if let Ok(json) = serde_json::from_str::<Value>(body)
            && let Some(msg) = json.get("error").and_then(|v| v.as_str())
        {
            message = format!("HTTP {status}: {msg}");
            details = Some(body.to_string());
        } else {
            message = format!("HTTP {status}: {}", body.trim());
            details = Some(body.to_string());
        }
        Self {
            kind: ApiErrorKind::HttpStatus,
            message,
            status: Some(status),
            details,
        }
    }

    /// Creates a network-level error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    /// Creates an empty-body error for streaming responses.
    pub fn empty_body() -> Self {
        Self::new(ApiErrorKind::EmptyBody, "Response had no stream body")
    }

    /// Classifies a reqwest error.
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::network(format!("Request timed out: {e}"))
        } else if e.is_connect() {
            Self::network(format!("Connection failed: {e}"))
        } else if e.is_decode() {
            Self::parse(format!("Failed to decode response: {e}"))
        } else {
            Self::network(format!("Network error: {e}"))
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
