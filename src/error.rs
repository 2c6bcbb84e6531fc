//! Error types for the normalization layer
//!
//! A single crate-wide error enum. Handlers never produce errors — shape
//! mismatches degrade to empty/default values — so `RelayError` only
//! surfaces from the HTTP layer and the dispatcher's upstream pull.

use thiserror::Error;

/// Errors produced while opening or consuming an upstream response stream
#[derive(Debug, Error)]
pub enum RelayError {
    /// HTTP transport failure (connect, send, non-success status)
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Malformed JSON or SSE payload
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failure while pulling from an open SSE stream
    #[error("Stream error: {0}")]
    StreamError(String),

    /// Structured upstream API error response
    #[error("API error {code}: {message}")]
    ApiError { code: u16, message: String },

    /// Stored response id does not exist or was not persisted
    #[error("Not found: {0}")]
    NotFound(String),

    /// In-band `error` event received on the stream
    #[error("Upstream error event: {0}")]
    UpstreamError(String),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl RelayError {
    /// Construct an `ApiError` from a status code and message
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
        }
    }

    /// Whether this error is fatal to the session only (vs. a config problem)
    pub fn is_session_error(&self) -> bool {
        !matches!(self, Self::ConfigError(_))
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        Self::HttpError(e.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(e: serde_json::Error) -> Self {
        Self::ParseError(e.to_string())
    }
}
