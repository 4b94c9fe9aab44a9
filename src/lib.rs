//! # Parley
//!
//! A discussion-board core that compiles natural-language intents to SQL.
//!
//! ## Architecture
//!
//! Every data access except the message listing is phrased as an intent and
//! turned into SQL by a language model at request time:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Board (routes)                        │
//! │  (messages, comments, votes, reactions, users)           │
//! └─────────────────────────────────────────────────────────┘
//!           │ intent                         │ listing
//!           ▼                                ▼
//! ┌───────────────────────────┐   ┌───────────────────────────┐
//! │       QueryCompiler       │   │   ReadCache (60s TTL)     │
//! │  synthesize → sanitize    │   │   hand-written SQL        │
//! └───────────────────────────┘   └───────────────────────────┘
//!           │                                │
//!           ▼                                ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │              RelationalExecutor (SQLite)                 │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Vote and reaction toggles sit beside the compiler: they either chain a
//! lookup intent with a write intent, or run fixed SQL in one transaction.

pub mod board;
pub mod cache;
pub mod compiler;
pub mod completion;
pub mod config;
pub mod executor;
pub mod intent;
pub mod schema;
pub mod synth;
pub mod toggle;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::board::{Board, BoardError, BoardResult, Profile};
    pub use crate::cache::ReadCache;
    pub use crate::compiler::{
        CompiledStatement, CompilerOptions, QueryCompiler, QueryError, QueryResult,
        StatementKind,
    };
    pub use crate::completion::{CompletionRequest, CompletionService, HttpCompletionService};
    pub use crate::config::Settings;
    pub use crate::executor::{RelationalExecutor, Row, Scalar, SqliteExecutor};
    pub use crate::synth::{
        CompletionSynthesizer, DeferredSynthesizer, FixtureSynthesizer, Synthesizer,
    };
    pub use crate::toggle::{ReactionOutcome, ToggleMode, VoteOutcome, VoteValue};
}

pub use board::Board;
pub use compiler::QueryCompiler;
pub use executor::{Row, Scalar};
