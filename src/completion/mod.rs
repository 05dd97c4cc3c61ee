// Unified completion interface for LLM providers

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub mod openai;

pub use openai::OpenAiClient;

/// One role-tagged turn in a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A named JSON schema the provider must decode its output against.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
}

/// Typed errors from completion providers
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized - check API key")]
    Unauthorized,

    #[error("Rate limited - too many requests")]
    RateLimited,

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("HTTP error ({0}): {1}")]
    HttpError(u16, String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Provider returned no text content")]
    EmptyResponse,

    #[error("Structured output did not match the requested schema: {0}")]
    Decoding(String),
}

/// Completion provider seam.
///
/// `complete` returns the provider's free-text response. `complete_structured`
/// constrains decoding to `schema` and returns the conforming JSON value;
/// a response that cannot be coerced to the schema is a
/// [`CompletionError::Decoding`]. Neither call is retried here.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;

    async fn complete_structured(
        &self,
        messages: &[ChatMessage],
        schema: &OutputSchema,
    ) -> Result<Value, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_constructors() {
        let sys = ChatMessage::system("be precise");
        assert_eq!(sys.role, "system");
        assert_eq!(sys.content, "be precise");

        let user = ChatMessage::user("hello");
        assert_eq!(user.role, "user");
    }

    #[test]
    fn test_chat_message_serializes_to_wire_shape() {
        let msg = ChatMessage::user("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hi"}));
    }
}
