//! SQL synthesis module.
//!
//! A [`Synthesizer`] turns a natural-language intent into raw text that
//! should contain one SQL statement. The production implementation,
//! [`CompletionSynthesizer`], wraps a [`CompletionService`] with the fixed
//! system instruction. [`FixtureSynthesizer`] is a deterministic stand-in
//! that maps exact intent strings to canned SQL, so the compiler and the
//! toggles can be exercised without a model.
//!
//! [`CompletionService`]: crate::completion::CompletionService

mod error;
pub mod fixture;
mod instruction;

pub use error::{SynthResult, SynthesisError};
pub use fixture::FixtureSynthesizer;
pub use instruction::system_instruction;

use async_trait::async_trait;

use tokio::sync::OnceCell;

use crate::completion::{CompletionRequest, CompletionService, HttpCompletionService};
use crate::config::CompletionSettings;

/// Produces raw SQL text for an intent.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Return the raw completion for `intent`. No retries, no state.
    async fn synthesize(&self, intent: &str) -> SynthResult<String>;
}

/// Synthesizer backed by a completion service.
pub struct CompletionSynthesizer<C> {
    service: C,
}

impl<C: CompletionService> CompletionSynthesizer<C> {
    pub fn new(service: C) -> Self {
        Self { service }
    }

    /// The underlying completion service.
    pub fn service(&self) -> &C {
        &self.service
    }
}

#[async_trait]
impl<C: CompletionService> Synthesizer for CompletionSynthesizer<C> {
    async fn synthesize(&self, intent: &str) -> SynthResult<String> {
        let request = CompletionRequest::new(system_instruction(), intent);
        match self.service.complete(&request).await {
            Ok(text) => Ok(text),
            Err(err) => {
                tracing::warn!(error = %err, retriable = err.is_retriable(), "completion failed");
                Err(err.into())
            }
        }
    }
}

/// HTTP-backed synthesizer that builds its client on first use.
///
/// The API key is resolved at that point, so a missing key variable only
/// fails operations that actually synthesize.
pub struct DeferredSynthesizer {
    settings: CompletionSettings,
    inner: OnceCell<CompletionSynthesizer<HttpCompletionService>>,
}

impl DeferredSynthesizer {
    pub fn new(settings: CompletionSettings) -> Self {
        Self {
            settings,
            inner: OnceCell::new(),
        }
    }

    async fn synthesizer(&self) -> SynthResult<&CompletionSynthesizer<HttpCompletionService>> {
        self.inner
            .get_or_try_init(|| async {
                let api_key = self
                    .settings
                    .resolved_api_key()
                    .map_err(|e| SynthesisError::Unconfigured(e.to_string()))?;
                let service = HttpCompletionService::from_settings(&self.settings, api_key)?;
                tracing::debug!(model = service.model(), "completion service ready");
                Ok::<_, SynthesisError>(CompletionSynthesizer::new(service))
            })
            .await
    }
}

#[async_trait]
impl Synthesizer for DeferredSynthesizer {
    async fn synthesize(&self, intent: &str) -> SynthResult<String> {
        self.synthesizer().await?.synthesize(intent).await
    }
}
