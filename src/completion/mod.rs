//! Completion service module.
//!
//! A completion service turns a system instruction plus a user instruction
//! into free-form text. Its output is untrusted: nothing it returns reaches
//! the store without passing through the sanitizer and the executor.
//!
//! ```text
//! ┌──────────────────┐   {system, user}   ┌──────────────────────┐
//! │  SqlSynthesizer  │ ─────────────────▶ │  CompletionService   │
//! └──────────────────┘ ◀───────────────── │  (LLM endpoint)      │
//!                          raw text       └──────────────────────┘
//! ```

mod error;
mod http;
pub mod protocol;

pub use error::{CompletionError, CompletionResult};
pub use http::{HttpCompletionService, HttpCompletionServiceBuilder};

use async_trait::async_trait;

/// A system/user instruction pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Generates text for an instruction pair.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Return the completion text verbatim.
    ///
    /// Implementations do not retry.
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult<String>;
}
