//! Integration tests for the intent → SQL → rows pipeline.
//!
//! Every test uses the fixture synthesizer and an in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use parley::compiler::{QueryCompiler, QueryError, StatementKind};
use parley::completion::CompletionError;
use parley::executor::{RelationalExecutor, SqliteExecutor};
use parley::synth::{FixtureSynthesizer, SynthResult, SynthesisError, Synthesizer};
use serde_json::json;

const INSERT_HELLO: &str = "Insert a new message with userId 7, title \"Hello\", and content \"World\"";

async fn store() -> Arc<SqliteExecutor> {
    let exec = SqliteExecutor::open_in_memory().unwrap();
    exec.install_schema().await.unwrap();
    exec.execute(
        r#"INSERT INTO users (id, username, email, "passwordHash") VALUES (7, 'ada', 'ada@example.com', 'x')"#,
        &[],
    )
    .await
    .unwrap();
    Arc::new(exec)
}

/// A synthesizer whose endpoint is always down.
struct Offline;

#[async_trait]
impl Synthesizer for Offline {
    async fn synthesize(&self, _intent: &str) -> SynthResult<String> {
        Err(CompletionError::Timeout(60).into())
    }
}

// ============================================================================
// End-to-end
// ============================================================================

#[tokio::test]
async fn test_insert_message_end_to_end() {
    let exec = store().await;
    let synth = Arc::new(FixtureSynthesizer::new().with(
        INSERT_HELLO,
        "```sql\nINSERT INTO messages (\"userId\", title, content) VALUES (7, 'Hello', 'World');\n```",
    ));
    let compiler = QueryCompiler::new(synth.clone(), exec.clone());

    let rows = compiler.compile_and_run(INSERT_HELLO, &[]).await.unwrap();
    assert!(rows.is_empty());

    let stored = exec
        .execute(r#"SELECT "userId", title, content FROM messages"#, &[])
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["userId"], json!(7));
    assert_eq!(stored[0]["title"], json!("Hello"));
    assert_eq!(stored[0]["content"], json!("World"));
}

#[tokio::test]
async fn test_params_bound_positionally() {
    let exec = store().await;
    let synth = Arc::new(
        FixtureSynthesizer::new().with("Get the user by id", "SELECT username FROM users WHERE id = ?1"),
    );
    let compiler = QueryCompiler::new(synth, exec);

    let rows = compiler
        .compile_and_run("Get the user by id", &[7.into()])
        .await
        .unwrap();
    assert_eq!(rows, vec![json!({ "username": "ada" }).as_object().unwrap().clone()]);
}

#[tokio::test]
async fn test_compile_classifies() {
    let synth = Arc::new(
        FixtureSynthesizer::new()
            .with("read", "Here:\nWITH x AS (SELECT 1) SELECT * FROM x")
            .with("write", "DELETE FROM votes WHERE id = 1"),
    );
    let compiler = QueryCompiler::new(synth, store().await);

    assert_eq!(compiler.compile("read", &[]).await.unwrap().kind, StatementKind::Read);
    assert_eq!(compiler.compile("write", &[]).await.unwrap().kind, StatementKind::Write);
}

// ============================================================================
// No memoization
// ============================================================================

#[tokio::test]
async fn test_every_call_resynthesizes() {
    let synth = Arc::new(FixtureSynthesizer::new().with("count", "SELECT COUNT(*) AS n FROM users"));
    let compiler = QueryCompiler::new(synth.clone(), store().await);

    for _ in 0..3 {
        compiler.compile_and_run("count", &[]).await.unwrap();
    }
    assert_eq!(synth.calls(), 3);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_completion_unavailable() {
    let compiler = QueryCompiler::new(Arc::new(Offline), store().await);
    let err = compiler.compile_and_run("anything", &[]).await.unwrap_err();
    assert!(err.is_completion_unavailable());
    assert!(matches!(
        err,
        QueryError::CompilationFailed(SynthesisError::CompletionUnavailable(CompletionError::Timeout(60)))
    ));
}

#[tokio::test]
async fn test_unknown_intent_is_compilation_failure() {
    let compiler = QueryCompiler::new(Arc::new(FixtureSynthesizer::new()), store().await);
    let err = compiler.compile_and_run("not registered", &[]).await.unwrap_err();
    assert!(matches!(
        err,
        QueryError::CompilationFailed(SynthesisError::UnknownIntent(_))
    ));
}

#[tokio::test]
async fn test_invalid_sql_leaves_store_unchanged() {
    let exec = store().await;
    let synth = Arc::new(
        FixtureSynthesizer::new().with("broken", "INSERT INTO messages (nope) VALUES (1)"),
    );
    let compiler = QueryCompiler::new(synth, exec.clone());

    let err = compiler.compile_and_run("broken", &[]).await.unwrap_err();
    assert!(matches!(err, QueryError::ExecutionFailed(_)));
    assert!(!err.is_constraint_violation());

    let rows = exec.execute("SELECT id FROM messages", &[]).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_trailing_statement_rejected() {
    let exec = store().await;
    let synth = Arc::new(FixtureSynthesizer::new().with(
        "two",
        "SELECT 1;\nDELETE FROM users;",
    ));
    let compiler = QueryCompiler::new(synth, exec.clone());

    assert!(matches!(
        compiler.compile_and_run("two", &[]).await,
        Err(QueryError::ExecutionFailed(_))
    ));
    let users = exec.execute("SELECT id FROM users", &[]).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_unique_violation_reported() {
    let exec = store().await;
    let synth = Arc::new(FixtureSynthesizer::new().with(
        "dup",
        r#"INSERT INTO users (username, email, "passwordHash") VALUES ('ada', 'other@example.com', 'x')"#,
    ));
    let compiler = QueryCompiler::new(synth, exec);

    let err = compiler.compile_and_run("dup", &[]).await.unwrap_err();
    assert!(err.is_constraint_violation());
}
