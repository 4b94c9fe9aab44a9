//! Query compiler error types.

use thiserror::Error;

use crate::executor::ExecutorError;
use crate::synth::SynthesisError;

/// Result type for compiler operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors surfaced by the query compiler. Neither kind is recovered from
/// inside the compiler.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The intent could not be turned into a statement.
    #[error("compilation failed: {0}")]
    CompilationFailed(#[from] SynthesisError),

    /// The store rejected the compiled statement.
    #[error("execution failed: {0}")]
    ExecutionFailed(#[from] ExecutorError),
}

impl QueryError {
    /// Check if the store refused the statement because of a constraint.
    ///
    /// Concurrent check-then-write toggles on the same key end this way for
    /// the loser.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ExecutionFailed(e) if e.is_constraint_violation())
    }

    /// Check if the completion endpoint was the cause.
    pub fn is_completion_unavailable(&self) -> bool {
        matches!(
            self,
            Self::CompilationFailed(SynthesisError::CompletionUnavailable(_))
        )
    }
}
