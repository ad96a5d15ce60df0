//! Typed errors for the image feed.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so the paging layer
//! can tell transport failures from malformed data from caller mistakes.

use thiserror::Error;

/// Errors that can occur while loading or mapping images.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport failure or non-2xx response from the remote source
    #[error("fetch failed: {0}")]
    Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Response could not be decoded, or a record is missing required data
    #[error("malformed record: {reason}")]
    Malformed { reason: String },

    /// Caller supplied a blank or unusable image id
    #[error("invalid or missing image id")]
    InvalidId,

    /// Operation was cancelled
    #[error("operation cancelled")]
    Cancelled,

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl FeedError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        FeedError::Malformed {
            reason: reason.into(),
        }
    }

    /// Failures a user-triggered retry could plausibly fix.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FeedError::Fetch(_))
    }
}

/// Result type alias for feed operations.
pub type FeedResult<T> = std::result::Result<T, FeedError>;
