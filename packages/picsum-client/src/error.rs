//! Error types for the Picsum client.

use thiserror::Error;

/// Result type for Picsum client operations.
pub type Result<T> = std::result::Result<T, PicsumError>;

/// Picsum client errors.
#[derive(Debug, Error)]
pub enum PicsumError {
    /// Transport error (connection refused, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the API
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected JSON shape
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Base URL cannot carry path segments (e.g. `mailto:`)
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl PicsumError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            PicsumError::Api { status, .. } => Some(*status),
            PicsumError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the failure happened before a response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, PicsumError::Http(_))
    }
}
