//! Vote toggle.

use std::fmt;

use crate::compiler::{QueryCompiler, QueryResult};
use crate::executor::{BoundStatement, Row, Scalar};
use crate::intent;

use super::ToggleMode;

const SELECT_VOTE: &str = r#"SELECT value FROM votes WHERE "messageId" = ?1 AND "userId" = ?2"#;

const DELETE_SAME_VOTE: &str =
    r#"DELETE FROM votes WHERE "messageId" = ?1 AND "userId" = ?2 AND value = ?3"#;

/// Inserts or overwrites unless the delete above removed a row.
const UPSERT_VOTE: &str = r#"INSERT INTO votes ("messageId", "userId", value)
SELECT ?1, ?2, ?3 WHERE changes() = 0
ON CONFLICT ("messageId", "userId") DO UPDATE SET value = excluded.value"#;

/// A valid vote direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    /// `1` is up, `-1` is down; anything else is not a vote.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            1 => Some(VoteValue::Up),
            -1 => Some(VoteValue::Down),
            _ => None,
        }
    }

    pub fn as_i64(self) -> i64 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.as_i64())
    }
}

/// What a vote request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// No prior vote; one was inserted.
    Cast(VoteValue),
    /// A vote with the other value was overwritten. `from` is `None` when
    /// the stored row had no readable value.
    Changed {
        from: Option<VoteValue>,
        to: VoteValue,
    },
    /// The same value was submitted again; the vote was removed.
    Withdrawn(VoteValue),
    /// The submitted value was not ±1; nothing ran.
    Rejected(i64),
}

impl VoteOutcome {
    /// Whether the store was written.
    pub fn is_applied(&self) -> bool {
        !matches!(self, VoteOutcome::Rejected(_))
    }

    /// The vote held after this request, if any.
    pub fn current(&self) -> Option<VoteValue> {
        match self {
            VoteOutcome::Cast(v) => Some(*v),
            VoteOutcome::Changed { to, .. } => Some(*to),
            VoteOutcome::Withdrawn(_) | VoteOutcome::Rejected(_) => None,
        }
    }
}

/// Decide the transition from the prior row (if any).
fn transition(prior: Option<&Row>, desired: VoteValue) -> VoteOutcome {
    let Some(row) = prior else {
        return VoteOutcome::Cast(desired);
    };

    let stored = row
        .get("value")
        .and_then(serde_json::Value::as_i64)
        .and_then(VoteValue::from_raw);

    if stored == Some(desired) {
        VoteOutcome::Withdrawn(desired)
    } else {
        VoteOutcome::Changed {
            from: stored,
            to: desired,
        }
    }
}

/// Apply a vote of `raw_value` by `user_id` on `message_id`.
///
/// Values other than ±1 return [`VoteOutcome::Rejected`] without touching
/// the store.
pub async fn toggle_vote(
    compiler: &QueryCompiler,
    mode: ToggleMode,
    message_id: i64,
    user_id: i64,
    raw_value: i64,
) -> QueryResult<VoteOutcome> {
    let Some(desired) = VoteValue::from_raw(raw_value) else {
        tracing::debug!(message_id, user_id, raw_value, "vote rejected");
        return Ok(VoteOutcome::Rejected(raw_value));
    };

    let outcome = if mode.use_atomic(compiler.executor().as_ref()) {
        toggle_atomic(compiler, message_id, user_id, desired).await?
    } else {
        toggle_compiled(compiler, message_id, user_id, desired).await?
    };

    tracing::debug!(message_id, user_id, ?outcome, "vote toggled");
    Ok(outcome)
}

async fn toggle_compiled(
    compiler: &QueryCompiler,
    message_id: i64,
    user_id: i64,
    desired: VoteValue,
) -> QueryResult<VoteOutcome> {
    let prior = compiler
        .run_one(&intent::find_vote(message_id, user_id), &[])
        .await?;
    let outcome = transition(prior.as_ref(), desired);

    let write = match outcome {
        VoteOutcome::Withdrawn(_) => intent::delete_vote(message_id, user_id),
        VoteOutcome::Changed { to, .. } => intent::update_vote(message_id, user_id, to.as_i64()),
        _ => intent::insert_vote(message_id, user_id, desired.as_i64()),
    };
    compiler.compile_and_run(&write, &[]).await?;

    Ok(outcome)
}

async fn toggle_atomic(
    compiler: &QueryCompiler,
    message_id: i64,
    user_id: i64,
    desired: VoteValue,
) -> QueryResult<VoteOutcome> {
    let key: Vec<Scalar> = vec![message_id.into(), user_id.into()];
    let mut keyed = key.clone();
    keyed.push(desired.as_i64().into());

    let results = compiler
        .executor()
        .execute_atomic(vec![
            BoundStatement::new(SELECT_VOTE, key),
            BoundStatement::new(DELETE_SAME_VOTE, keyed.clone()),
            BoundStatement::new(UPSERT_VOTE, keyed),
        ])
        .await?;

    let prior = results.first().and_then(|rows| rows.first());
    Ok(transition(prior, desired))
}
