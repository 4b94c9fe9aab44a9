//! Relational executor module.
//!
//! The executor is the only component that touches durable state. It runs a
//! literal SQL string with positionally bound parameters and returns rows as
//! JSON objects. The query compiler, toggles and board service are written
//! against the [`RelationalExecutor`] trait; [`SqliteExecutor`] is the
//! bundled implementation.
//!
//! # Example
//!
//! ```ignore
//! use parley::executor::{RelationalExecutor, SqliteExecutor};
//!
//! let exec = SqliteExecutor::open("board.db")?;
//! exec.install_schema().await?;
//!
//! let rows = exec
//!     .execute("SELECT username FROM users WHERE id = ?1", &[7.into()])
//!     .await?;
//! ```

mod error;
mod scalar;
mod sqlite;

pub use error::{ExecResult, ExecutorError};
pub use scalar::{Row, Scalar};
pub use sqlite::SqliteExecutor;

use async_trait::async_trait;

/// A SQL string with its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    pub sql: String,
    pub params: Vec<Scalar>,
}

impl BoundStatement {
    pub fn new(sql: impl Into<String>, params: Vec<Scalar>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Runs SQL against a relational store.
#[async_trait]
pub trait RelationalExecutor: Send + Sync {
    /// Execute one statement and return every row it produces.
    ///
    /// Each call is a single atomic execution: a failing statement leaves
    /// the store unchanged.
    async fn execute(&self, sql: &str, params: &[Scalar]) -> ExecResult<Vec<Row>>;

    /// Execute several statements inside one transaction.
    ///
    /// Either every statement commits or none does. Returns the rows of each
    /// statement in order. Stores without transactional batches keep the
    /// default, which refuses.
    async fn execute_atomic(&self, _statements: Vec<BoundStatement>) -> ExecResult<Vec<Vec<Row>>> {
        Err(ExecutorError::Unsupported("atomic statement batches"))
    }

    /// Whether [`execute_atomic`](Self::execute_atomic) is available.
    fn supports_atomic(&self) -> bool {
        false
    }
}
