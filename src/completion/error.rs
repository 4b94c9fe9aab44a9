//! Completion-specific error types.

use thiserror::Error;

/// Result type for completion calls.
pub type CompletionResult<T> = Result<T, CompletionError>;

/// Errors that can occur while asking the completion endpoint for text.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// The endpoint could not be reached (DNS, TLS, connection reset).
    #[error("completion endpoint unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The request exceeded the configured deadline.
    #[error("completion request timed out after {0} seconds")]
    Timeout(u64),

    /// The endpoint answered with a non-success status.
    #[error("completion endpoint returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The response carried no textual completion.
    #[error("malformed completion response: {0}")]
    Malformed(String),
}

impl CompletionError {
    /// Check if a caller-side retry could plausibly succeed.
    ///
    /// The core never retries; this only informs callers that implement a
    /// retry policy of their own.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Unreachable(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Malformed(_) => false,
        }
    }
}
