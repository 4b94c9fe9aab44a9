//! Board error types.

use thiserror::Error;

use crate::compiler::QueryError;

pub type BoardResult<T> = Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    /// A required text field was empty or whitespace.
    #[error("{0} must not be empty")]
    InvalidInput(&'static str),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl BoardError {
    /// Whether the store rejected a write on a uniqueness or check constraint.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            BoardError::Query(err) => err.is_constraint_violation(),
            BoardError::InvalidInput(_) => false,
        }
    }
}
