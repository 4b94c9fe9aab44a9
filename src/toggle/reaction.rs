//! Reaction toggle.

use crate::compiler::{QueryCompiler, QueryResult};
use crate::executor::{BoundStatement, Scalar};
use crate::intent;

use super::ToggleMode;

const SELECT_REACTION: &str =
    r#"SELECT id FROM reactions WHERE "messageId" = ?1 AND "userId" = ?2 AND emoji = ?3"#;

const DELETE_REACTION: &str =
    r#"DELETE FROM reactions WHERE "messageId" = ?1 AND "userId" = ?2 AND emoji = ?3"#;

/// Inserts unless the delete above removed a row.
const INSERT_REACTION: &str = r#"INSERT INTO reactions ("messageId", "userId", emoji)
SELECT ?1, ?2, ?3 WHERE changes() = 0"#;

/// What a reaction request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionOutcome {
    Added,
    Removed,
}

/// Toggle `emoji` by `user_id` on `message_id`.
pub async fn toggle_reaction(
    compiler: &QueryCompiler,
    mode: ToggleMode,
    message_id: i64,
    user_id: i64,
    emoji: &str,
) -> QueryResult<ReactionOutcome> {
    let outcome = if mode.use_atomic(compiler.executor().as_ref()) {
        toggle_atomic(compiler, message_id, user_id, emoji).await?
    } else {
        toggle_compiled(compiler, message_id, user_id, emoji).await?
    };

    tracing::debug!(message_id, user_id, emoji, ?outcome, "reaction toggled");
    Ok(outcome)
}

async fn toggle_compiled(
    compiler: &QueryCompiler,
    message_id: i64,
    user_id: i64,
    emoji: &str,
) -> QueryResult<ReactionOutcome> {
    let existing = compiler
        .run_one(&intent::find_reaction(message_id, user_id, emoji), &[])
        .await?;

    if existing.is_some() {
        compiler
            .compile_and_run(&intent::delete_reaction(message_id, user_id, emoji), &[])
            .await?;
        Ok(ReactionOutcome::Removed)
    } else {
        compiler
            .compile_and_run(&intent::insert_reaction(message_id, user_id, emoji), &[])
            .await?;
        Ok(ReactionOutcome::Added)
    }
}

async fn toggle_atomic(
    compiler: &QueryCompiler,
    message_id: i64,
    user_id: i64,
    emoji: &str,
) -> QueryResult<ReactionOutcome> {
    let key: Vec<Scalar> = vec![message_id.into(), user_id.into(), emoji.into()];

    let results = compiler
        .executor()
        .execute_atomic(vec![
            BoundStatement::new(SELECT_REACTION, key.clone()),
            BoundStatement::new(DELETE_REACTION, key.clone()),
            BoundStatement::new(INSERT_REACTION, key),
        ])
        .await?;

    let existed = results.first().is_some_and(|rows| !rows.is_empty());
    Ok(if existed {
        ReactionOutcome::Removed
    } else {
        ReactionOutcome::Added
    })
}
