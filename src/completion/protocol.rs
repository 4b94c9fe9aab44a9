//! Chat-completions wire format.
//!
//! Requests follow the OpenAI-compatible `chat/completions` shape. Responses
//! are read as loose JSON so a missing field is reported as a malformed
//! response instead of a deserialization failure deep inside serde.

use serde::Serialize;
use serde_json::Value;

use super::error::{CompletionError, CompletionResult};

/// Chat role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
}

impl<'a> ChatRequest<'a> {
    pub fn new(model: &'a str, system: &'a str, user: &'a str) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: system,
                },
                ChatMessage {
                    role: Role::User,
                    content: user,
                },
            ],
        }
    }
}

/// Pull `choices[0].message.content` out of a response body.
pub fn extract_completion(body: &Value) -> CompletionResult<String> {
    let choice = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or_else(|| CompletionError::Malformed("response has no choices".to_string()))?;

    choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| CompletionError::Malformed("first choice has no text content".to_string()))
}
