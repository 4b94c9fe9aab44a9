//! SQLite implementation of the relational executor.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{Connection, TransactionBehavior};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

use super::error::{ExecResult, ExecutorError};
use super::scalar::{cell_to_json, Row, Scalar};
use super::{BoundStatement, RelationalExecutor};
use crate::schema;

/// Executor backed by a single SQLite connection.
///
/// Statements run on tokio's blocking pool. The connection is shared behind
/// a mutex, so statements from concurrent tasks are serialized.
#[derive(Clone)]
pub struct SqliteExecutor {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteExecutor {
    /// Open (or create) a database file with foreign keys enforced.
    pub fn open<P: AsRef<Path>>(path: P) -> ExecResult<Self> {
        Self::open_with(path, true)
    }

    /// Open (or create) a database file. `":memory:"` opens a private
    /// in-memory store.
    pub fn open_with<P: AsRef<Path>>(path: P, foreign_keys: bool) -> ExecResult<Self> {
        let conn = Connection::open(path).map_err(ExecutorError::Open)?;
        Self::from_connection(conn, foreign_keys)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> ExecResult<Self> {
        let conn = Connection::open_in_memory().map_err(ExecutorError::Open)?;
        Self::from_connection(conn, true)
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: Connection, foreign_keys: bool) -> ExecResult<Self> {
        conn.pragma_update(None, "foreign_keys", foreign_keys)
            .map_err(ExecutorError::Open)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create the board tables if they do not exist.
    pub async fn install_schema(&self) -> ExecResult<()> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| ExecutorError::Poisoned)?;
            let script = schema::create_script();
            conn.execute_batch(&script)
                .map_err(|source| ExecutorError::Database { sql: script, source })
        })
        .await?
    }
}

/// Whether anything but whitespace, comments or semicolons follows the
/// first statement terminator.
///
/// Text that does not tokenize is left for SQLite to reject.
fn has_trailing_statement(sql: &str) -> bool {
    let Ok(tokens) = Tokenizer::new(&SQLiteDialect {}, sql).tokenize() else {
        return false;
    };

    let mut terminated = false;
    for token in tokens {
        match token {
            Token::SemiColon => terminated = true,
            Token::Whitespace(_) | Token::EOF => {}
            _ if terminated => return true,
            _ => {}
        }
    }
    false
}

/// Run one statement and collect every row it returns.
///
/// Non-query statements (INSERT without RETURNING, UPDATE, DELETE) are
/// stepped to completion and yield no rows. Text holding more than one
/// statement is refused before anything runs, since `prepare` would
/// otherwise compile the first and drop the rest.
fn run(conn: &Connection, sql: &str, params: &[Scalar]) -> rusqlite::Result<Vec<Row>> {
    if has_trailing_statement(sql) {
        return Err(rusqlite::Error::MultipleStatement);
    }

    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = Row::new();
        for (i, name) in columns.iter().enumerate() {
            record.insert(name.clone(), cell_to_json(row.get_ref(i)?));
        }
        out.push(record);
    }
    Ok(out)
}

#[async_trait]
impl RelationalExecutor for SqliteExecutor {
    async fn execute(&self, sql: &str, params: &[Scalar]) -> ExecResult<Vec<Row>> {
        let conn = Arc::clone(&self.conn);
        let sql = sql.to_string();
        let params = params.to_vec();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| ExecutorError::Poisoned)?;
            run(&conn, &sql, &params).map_err(|source| ExecutorError::Database { sql, source })
        })
        .await?
    }

    async fn execute_atomic(&self, statements: Vec<BoundStatement>) -> ExecResult<Vec<Vec<Row>>> {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().map_err(|_| ExecutorError::Poisoned)?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|source| ExecutorError::Database {
                    sql: "BEGIN IMMEDIATE".to_string(),
                    source,
                })?;

            let mut results = Vec::with_capacity(statements.len());
            for statement in statements {
                let rows = run(&tx, &statement.sql, &statement.params).map_err(|source| {
                    ExecutorError::Database {
                        sql: statement.sql.clone(),
                        source,
                    }
                })?;
                results.push(rows);
            }

            tx.commit().map_err(|source| ExecutorError::Database {
                sql: "COMMIT".to_string(),
                source,
            })?;
            Ok(results)
        })
        .await?
    }

    fn supports_atomic(&self) -> bool {
        true
    }
}
