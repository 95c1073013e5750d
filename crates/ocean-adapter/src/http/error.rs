/*
[INPUT]:  Error sources (HTTP, API, serialization, input validation, config, socket transport)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the Ocean adapter
#[derive(Error, Debug)]
pub enum OceanError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Caller supplied a value that cannot be sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Emit attempted without a live socket
    #[error("WebSocket not connected")]
    NotConnected,

    /// Subscription handle used after its stream was dropped
    #[error("Subscription stream closed")]
    StreamClosed,

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection timeout
    #[error("Connection timeout after {duration}s")]
    Timeout { duration: u64 },
}

impl OceanError {
    /// Check if the error is retryable
    ///
    /// This is a hint for callers wrapping the adapter; nothing in this crate retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OceanError::Http(_)
                | OceanError::Timeout { .. }
                | OceanError::WebSocket(_)
                | OceanError::NotConnected
                | OceanError::InvalidResponse(_)
        )
    }

    /// Check if error was raised before any I/O because of bad caller input
    pub fn is_input_error(&self) -> bool {
        matches!(self, OceanError::InvalidInput(_))
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        OceanError::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        OceanError::InvalidInput(message.into())
    }
}

/// Result type alias for Ocean operations
pub type Result<T> = std::result::Result<T, OceanError>;
