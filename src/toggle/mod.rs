//! Vote and reaction toggles.
//!
//! Each toggle is a small state machine keyed by (message, user) for votes
//! and (message, user, emoji) for reactions:
//!
//! ```text
//! vote v:      Absent ──v──▶ Present(v) ──v──▶ Absent
//!                             Present(v') ──v──▶ Present(v)
//!
//! reaction e:  Absent ──e──▶ Present ──e──▶ Absent
//! ```
//!
//! Two execution strategies exist:
//!
//! - **Compiled**: a lookup intent, then an insert/update/delete intent,
//!   all through the query compiler. The two steps are not atomic. Two
//!   concurrent toggles on one key can both see "absent" and both insert;
//!   the store's uniqueness constraint rejects the second insert, which
//!   surfaces as a constraint-violation `ExecutionFailed`. No
//!   application-level lock is taken.
//! - **Atomic**: fixed SQL run as one transaction on executors that support
//!   it, so lookup and write cannot interleave with another toggle.

mod reaction;
mod vote;

pub use reaction::{toggle_reaction, ReactionOutcome};
pub use vote::{toggle_vote, VoteOutcome, VoteValue};

use serde::{Deserialize, Serialize};

use crate::executor::RelationalExecutor;

/// How toggles reach the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleMode {
    /// Atomic when the executor supports transactions, compiled otherwise.
    #[default]
    Auto,
    /// Always use one transaction of fixed SQL.
    Atomic,
    /// Always go through the query compiler (check, then write).
    Compiled,
}

impl ToggleMode {
    /// Whether to take the atomic path on `executor`.
    pub fn use_atomic(self, executor: &dyn RelationalExecutor) -> bool {
        match self {
            ToggleMode::Auto => executor.supports_atomic(),
            ToggleMode::Atomic => true,
            ToggleMode::Compiled => false,
        }
    }
}
