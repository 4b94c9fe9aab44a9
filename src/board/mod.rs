//! Discussion board service.
//!
//! [`Board`] is what request handlers call. It owns the query compiler, the
//! listing cache and the toggle mode, and turns each operation into an
//! intent (or, for the listing, a fixed query).
//!
//! Cache rules:
//!
//! | Operation        | Invalidates listing |
//! |------------------|---------------------|
//! | `create_message` | yes                 |
//! | `add_comment`    | yes                 |
//! | `vote`           | yes, when applied   |
//! | `react`          | no                  |

mod error;
mod listing;

pub use error::{BoardError, BoardResult};

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::cache::{ReadCache, DEFAULT_TTL};
use crate::compiler::QueryCompiler;
use crate::config::Settings;
use crate::executor::Row;
use crate::intent;
use crate::toggle::{self, ReactionOutcome, ToggleMode, VoteOutcome};

use listing::LISTING_SQL;

/// Columns of the detail row that arrive as JSON text.
const JSON_COLUMNS: &[&str] = &["comments", "reactions", "userReactions"];

/// A user and the messages they wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub user: Row,
    pub messages: Vec<Row>,
}

pub struct Board {
    compiler: QueryCompiler,
    listing: ReadCache<Vec<Row>>,
    toggle_mode: ToggleMode,
}

impl Board {
    pub fn new(compiler: QueryCompiler) -> Self {
        Self {
            compiler,
            listing: ReadCache::new(DEFAULT_TTL),
            toggle_mode: ToggleMode::default(),
        }
    }

    /// Build a board with the cache and toggle settings applied.
    pub fn from_settings(compiler: QueryCompiler, settings: &Settings) -> Self {
        Self::new(compiler)
            .with_listing_ttl(settings.cache.listing_ttl())
            .with_toggle_mode(settings.toggle.mode)
    }

    pub fn with_listing_ttl(mut self, ttl: Duration) -> Self {
        self.listing = ReadCache::new(ttl);
        self
    }

    pub fn with_toggle_mode(mut self, mode: ToggleMode) -> Self {
        self.toggle_mode = mode;
        self
    }

    pub fn compiler(&self) -> &QueryCompiler {
        &self.compiler
    }

    pub fn toggle_mode(&self) -> ToggleMode {
        self.toggle_mode
    }

    /// Drop the cached listing.
    pub fn invalidate_cache(&self) {
        tracing::debug!("listing cache invalidated");
        self.listing.invalidate();
    }

    // ========================================================================
    // Messages
    // ========================================================================

    /// All messages, newest first, with author and counts.
    pub async fn list_messages(&self) -> BoardResult<Vec<Row>> {
        let compiler = &self.compiler;
        Ok(self
            .listing
            .get_or_try_compute(|| compiler.run_raw(LISTING_SQL, &[]))
            .await?)
    }

    /// Post a message. Returns the new id when the store reports one.
    pub async fn create_message(
        &self,
        user_id: i64,
        title: &str,
        content: &str,
    ) -> BoardResult<Option<i64>> {
        require("title", title)?;
        require("content", content)?;

        let row = self
            .compiler
            .run_one(&intent::create_message(user_id, title, content), &[])
            .await?;
        self.invalidate_cache();

        Ok(row.and_then(|r| r.get("id").and_then(Value::as_i64)))
    }

    /// One message with its author, score, comments and reactions, as seen
    /// by `viewer_id`.
    pub async fn message_detail(
        &self,
        message_id: i64,
        viewer_id: Option<i64>,
    ) -> BoardResult<Option<Row>> {
        let row = self
            .compiler
            .run_one(&intent::message_detail(message_id, viewer_id), &[])
            .await?;
        Ok(row.map(decode_json_columns))
    }

    pub async fn add_comment(&self, message_id: i64, user_id: i64, content: &str) -> BoardResult<()> {
        require("comment", content)?;

        self.compiler
            .compile_and_run(&intent::add_comment(message_id, user_id, content), &[])
            .await?;
        self.invalidate_cache();
        Ok(())
    }

    // ========================================================================
    // Toggles
    // ========================================================================

    pub async fn vote(&self, message_id: i64, user_id: i64, value: i64) -> BoardResult<VoteOutcome> {
        let outcome =
            toggle::toggle_vote(&self.compiler, self.toggle_mode, message_id, user_id, value).await?;
        if outcome.is_applied() {
            self.invalidate_cache();
        }
        Ok(outcome)
    }

    /// Reactions are not part of the listing, so the cache is left alone.
    pub async fn react(
        &self,
        message_id: i64,
        user_id: i64,
        emoji: &str,
    ) -> BoardResult<ReactionOutcome> {
        require("emoji", emoji)?;
        Ok(toggle::toggle_reaction(&self.compiler, self.toggle_mode, message_id, user_id, emoji).await?)
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn find_user(&self, username: &str) -> BoardResult<Option<Row>> {
        require("username", username)?;
        Ok(self.compiler.run_one(&intent::find_user(username), &[]).await?)
    }

    /// Register a user. `password_hash` is stored as given.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> BoardResult<Option<Row>> {
        require("username", username)?;
        require("email", email)?;
        require("password hash", password_hash)?;

        Ok(self
            .compiler
            .run_one(&intent::create_user(username, email, password_hash), &[])
            .await?)
    }

    /// A user and their messages, or `None` for an unknown username.
    pub async fn user_profile(&self, username: &str) -> BoardResult<Option<Profile>> {
        let Some(user) = self.find_user(username).await? else {
            return Ok(None);
        };
        let Some(user_id) = user.get("id").and_then(Value::as_i64) else {
            return Ok(None);
        };

        let messages = self
            .compiler
            .compile_and_run(&intent::user_messages(user_id), &[])
            .await?;
        Ok(Some(Profile { user, messages }))
    }
}

fn require(field: &'static str, value: &str) -> BoardResult<()> {
    if value.trim().is_empty() {
        Err(BoardError::InvalidInput(field))
    } else {
        Ok(())
    }
}

/// Parse aggregated JSON text columns into JSON values. Text that does not
/// parse is left as it is.
fn decode_json_columns(mut row: Row) -> Row {
    for column in JSON_COLUMNS {
        let parsed = match row.get(*column) {
            Some(Value::String(text)) => serde_json::from_str::<Value>(text).ok(),
            _ => None,
        };
        if let Some(value) = parsed {
            row.insert((*column).to_string(), value);
        }
    }
    row
}
