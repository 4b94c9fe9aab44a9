//! Executor-specific error types.

use thiserror::Error;

/// Result type for executor operations.
pub type ExecResult<T> = Result<T, ExecutorError>;

/// Errors raised while running SQL against the relational store.
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// The store rejected the statement (syntax, constraint, type mismatch).
    #[error("database rejected statement: {source}\nSQL: {sql}")]
    Database {
        /// The statement that failed.
        sql: String,
        /// Diagnostic from the driver.
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to open or configure the connection.
    #[error("failed to open database: {0}")]
    Open(#[source] rusqlite::Error),

    /// A previous panic left the connection lock poisoned.
    #[error("database connection lock poisoned")]
    Poisoned,

    /// The blocking task running the statement did not complete.
    #[error("database task failed: {0}")]
    Join(String),

    /// The executor does not support the requested capability.
    #[error("unsupported by this executor: {0}")]
    Unsupported(&'static str),
}

impl ExecutorError {
    /// Check if the store refused the statement because of a constraint
    /// (uniqueness, check, foreign key, not null).
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::Database { source, .. } => matches!(
                source.sqlite_error_code(),
                Some(rusqlite::ErrorCode::ConstraintViolation)
            ),
            _ => false,
        }
    }

    /// The statement attached to this error, if any.
    pub fn sql(&self) -> Option<&str> {
        match self {
            Self::Database { sql, .. } => Some(sql),
            _ => None,
        }
    }
}

impl From<tokio::task::JoinError> for ExecutorError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Join(err.to_string())
    }
}
