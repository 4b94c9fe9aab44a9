//! Natural-language query compiler.
//!
//! ```text
//! intent ──▶ Synthesizer ──▶ sanitize ──▶ CompiledStatement ──▶ RelationalExecutor ──▶ rows
//!              (model)       (format)      (sql + params)           (store)
//! ```
//!
//! Every call re-synthesizes: there is no plan cache and no SQL-string
//! memoization. A compiled statement is executed at most once.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use parley::compiler::QueryCompiler;
//!
//! let compiler = QueryCompiler::new(Arc::new(synthesizer), Arc::new(executor));
//! let rows = compiler
//!     .compile_and_run("Get all messages by userId ?1", &[7.into()])
//!     .await?;
//! ```

mod error;
pub mod sanitize;
mod statement;

pub use error::{QueryError, QueryResult};
pub use sanitize::sanitize;
pub use statement::StatementKind;

use std::sync::Arc;

use crate::config::CompilerSettings;
use crate::executor::{RelationalExecutor, Row, Scalar};
use crate::synth::{SynthesisError, Synthesizer};

/// Options for compilation.
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Fail with `CompilationFailed` when the sanitized completion does not
    /// start with a statement keyword, instead of handing it to the store.
    pub require_statement: bool,

    /// Record each compiled statement at `info` on the `parley::sql` target.
    pub log_sql: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            require_statement: true,
            log_sql: true,
        }
    }
}

impl CompilerOptions {
    pub fn with_require_statement(mut self, require: bool) -> Self {
        self.require_statement = require;
        self
    }

    pub fn with_log_sql(mut self, log: bool) -> Self {
        self.log_sql = log;
        self
    }
}

impl From<&CompilerSettings> for CompilerOptions {
    fn from(settings: &CompilerSettings) -> Self {
        Self {
            require_statement: settings.require_statement,
            log_sql: settings.log_sql,
        }
    }
}

/// A statement produced from one intent.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    /// Sanitized SQL.
    pub sql: String,
    /// Parameters bound positionally at execution.
    pub params: Vec<Scalar>,
    /// Leading-keyword classification.
    pub kind: StatementKind,
}

/// Compiles intents to SQL and runs them.
#[derive(Clone)]
pub struct QueryCompiler {
    synthesizer: Arc<dyn Synthesizer>,
    executor: Arc<dyn RelationalExecutor>,
    options: CompilerOptions,
}

impl QueryCompiler {
    pub fn new(synthesizer: Arc<dyn Synthesizer>, executor: Arc<dyn RelationalExecutor>) -> Self {
        Self {
            synthesizer,
            executor,
            options: CompilerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// The executor statements run against.
    pub fn executor(&self) -> &Arc<dyn RelationalExecutor> {
        &self.executor
    }

    /// Synthesize and sanitize the SQL for `intent` without running it.
    pub async fn compile(&self, intent: &str, params: &[Scalar]) -> QueryResult<CompiledStatement> {
        let raw = self.synthesizer.synthesize(intent).await?;
        let sql = sanitize(&raw);

        if self.options.require_statement && !sanitize::starts_with_statement(&sql) {
            return Err(SynthesisError::NoStatement { raw }.into());
        }

        let kind = StatementKind::classify(&sql);
        if self.options.log_sql {
            tracing::info!(target: "parley::sql", %kind, params = params.len(), "{}", sql);
        }

        Ok(CompiledStatement {
            sql,
            params: params.to_vec(),
            kind,
        })
    }

    /// Run a compiled statement.
    pub async fn execute(&self, statement: CompiledStatement) -> QueryResult<Vec<Row>> {
        Ok(self
            .executor
            .execute(&statement.sql, &statement.params)
            .await?)
    }

    /// Compile `intent` and run it with `params` bound positionally.
    pub async fn compile_and_run(&self, intent: &str, params: &[Scalar]) -> QueryResult<Vec<Row>> {
        let statement = self.compile(intent, params).await?;
        self.execute(statement).await
    }

    /// First row of [`compile_and_run`](Self::compile_and_run), if any.
    pub async fn run_one(&self, intent: &str, params: &[Scalar]) -> QueryResult<Option<Row>> {
        Ok(self.compile_and_run(intent, params).await?.into_iter().next())
    }

    /// Run hand-written SQL, bypassing synthesis.
    pub async fn run_raw(&self, sql: &str, params: &[Scalar]) -> QueryResult<Vec<Row>> {
        Ok(self.executor.execute(sql, params).await?)
    }
}
