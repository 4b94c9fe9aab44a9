//! HTTP completion client.

use std::time::Duration;

use async_trait::async_trait;

use super::error::{CompletionError, CompletionResult};
use super::protocol::{extract_completion, ChatRequest};
use super::{CompletionRequest, CompletionService};
use crate::config::CompletionSettings;

/// Completion service backed by an OpenAI-compatible endpoint.
///
/// # Example
///
/// ```ignore
/// use parley::completion::HttpCompletionService;
///
/// let service = HttpCompletionService::builder(
///     "https://ai.hackclub.com/proxy/v1/chat/completions",
///     "google/gemini-3-flash-preview",
/// )
/// .api_key(std::env::var("AI_API_KEY")?)
/// .timeout(Duration::from_secs(60))
/// .build()?;
/// ```
pub struct HttpCompletionService {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    /// Deadline in seconds, kept for error reporting.
    timeout_secs: Option<u64>,
}

/// Builder for [`HttpCompletionService`].
pub struct HttpCompletionServiceBuilder {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl HttpCompletionServiceBuilder {
    /// Bearer token sent with every request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Per-request deadline. Without one a hung endpoint blocks the caller.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> CompletionResult<HttpCompletionService> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(CompletionError::Unreachable)?;

        Ok(HttpCompletionService {
            client,
            endpoint: self.endpoint,
            model: self.model,
            api_key: self.api_key,
            timeout_secs: self.timeout.map(|t| t.as_secs()),
        })
    }
}

impl HttpCompletionService {
    pub fn builder(
        endpoint: impl Into<String>,
        model: impl Into<String>,
    ) -> HttpCompletionServiceBuilder {
        HttpCompletionServiceBuilder {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
            timeout: None,
        }
    }

    /// Build a client from settings. The API key must already be resolved.
    pub fn from_settings(
        settings: &CompletionSettings,
        api_key: Option<String>,
    ) -> CompletionResult<Self> {
        let mut builder = Self::builder(&settings.endpoint, &settings.model);
        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    /// The model name sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn map_transport(&self, err: reqwest::Error) -> CompletionError {
        if err.is_timeout() {
            CompletionError::Timeout(self.timeout_secs.unwrap_or(0))
        } else {
            CompletionError::Unreachable(err)
        }
    }
}

#[async_trait]
impl CompletionService for HttpCompletionService {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult<String> {
        let body = ChatRequest::new(&self.model, &request.system, &request.user);

        let mut http = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            http = http.bearer_auth(key);
        }

        let response = http.send().await.map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(status = status.as_u16(), error = %e, "error body unreadable");
                    format!("<body unreadable: {}>", e)
                }
            };
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.map_transport(e)
            } else {
                CompletionError::Malformed(e.to_string())
            }
        })?;

        extract_completion(&json)
    }
}
