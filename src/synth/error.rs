//! Synthesis error types.

use thiserror::Error;

use crate::completion::CompletionError;

/// Result type for synthesis.
pub type SynthResult<T> = Result<T, SynthesisError>;

/// Errors raised while turning an intent into SQL text.
#[derive(Error, Debug)]
pub enum SynthesisError {
    /// The completion service was unreachable or returned no text.
    #[error("completion unavailable: {0}")]
    CompletionUnavailable(#[from] CompletionError),

    /// The completion client could not be built from its settings.
    #[error("completion service not configured: {0}")]
    Unconfigured(String),

    /// The fixture synthesizer has no entry for this intent.
    #[error("no SQL registered for intent: {0}")]
    UnknownIntent(String),

    /// The sanitized completion does not start with a SQL statement keyword.
    #[error("completion did not contain a SQL statement: {raw:?}")]
    NoStatement {
        /// The completion text as received.
        raw: String,
    },
}
