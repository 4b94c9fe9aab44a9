//! Deterministic synthesizer backed by a fixed intent table.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{SynthResult, SynthesisError, Synthesizer};

/// Maps exact intent strings to canned completions.
///
/// The stored text is returned verbatim, so entries may include fences or
/// preamble to exercise the sanitizer.
///
/// ```ignore
/// let synth = FixtureSynthesizer::new()
///     .with("Count users", "SELECT COUNT(*) AS n FROM users;");
/// ```
#[derive(Debug, Default)]
pub struct FixtureSynthesizer {
    table: HashMap<String, String>,
    calls: AtomicUsize,
}

impl FixtureSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the completion returned for `intent`.
    pub fn with(mut self, intent: impl Into<String>, completion: impl Into<String>) -> Self {
        self.insert(intent, completion);
        self
    }

    /// Register the completion returned for `intent`.
    pub fn insert(&mut self, intent: impl Into<String>, completion: impl Into<String>) {
        self.table.insert(intent.into(), completion.into());
    }

    /// Number of `synthesize` calls made so far, hits and misses alike.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Synthesizer for FixtureSynthesizer {
    async fn synthesize(&self, intent: &str) -> SynthResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table
            .get(intent)
            .cloned()
            .ok_or_else(|| SynthesisError::UnknownIntent(intent.to_string()))
    }
}
