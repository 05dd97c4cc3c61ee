// OpenAI chat-completions client
//
// Speaks the /v1/chat/completions format. Structured output uses the
// json_schema response_format so the provider itself enforces the schema;
// a non-conforming payload surfaces as CompletionError::Decoding.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::{ChatMessage, CompletionClient, CompletionError, OutputSchema};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    /// Override the API base URL (testing and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn send(&self, request: &ChatRequest<'_>) -> Result<ChatResponse, CompletionError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!(model = %request.model, "sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else if e.is_connect() {
                    CompletionError::Connection(e.to_string())
                } else {
                    CompletionError::Network(e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => CompletionError::Unauthorized,
                429 => CompletionError::RateLimited,
                500..=599 => CompletionError::ServerError(status.as_u16(), error_body),
                _ => CompletionError::HttpError(status.as_u16(), error_body),
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        tracing::debug!(model = %chat_response.model, "completion response received");

        Ok(chat_response)
    }

    fn extract_text(response: ChatResponse) -> Result<String, CompletionError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::EmptyResponse)?;

        if let Some(reason) = &choice.finish_reason {
            tracing::debug!(finish_reason = %reason, "completion finished");
        }

        choice
            .message
            .content
            .filter(|text| !text.is_empty())
            .ok_or(CompletionError::EmptyResponse)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            response_format: None,
        };

        let response = self.send(&request).await?;
        Self::extract_text(response)
    }

    async fn complete_structured(
        &self,
        messages: &[ChatMessage],
        schema: &OutputSchema,
    ) -> Result<Value, CompletionError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            response_format: Some(ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: schema.name.clone(),
                    strict: true,
                    schema: schema.schema.clone(),
                },
            }),
        };

        let response = self.send(&request).await?;
        let text = Self::extract_text(response)?;

        serde_json::from_str(&text).map_err(|e| CompletionError::Decoding(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: String,
    strict: bool,
    schema: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: String,
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_defaults() {
        let client = OpenAiClient::new("test-key");
        assert_eq!(client.model, DEFAULT_MODEL);
        assert_eq!(client.temperature, 0.0);
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_builder_chain() {
        let client = OpenAiClient::new("test-key")
            .with_model("gpt-4o")
            .with_temperature(0.3)
            .with_timeout(Duration::from_secs(10))
            .with_base_url("http://localhost:9999");
        assert_eq!(client.model, "gpt-4o");
        assert_eq!(client.temperature, 0.3);
        assert_eq!(client.timeout, Duration::from_secs(10));
        assert_eq!(client.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_request_omits_response_format_for_free_text() {
        let messages = vec![ChatMessage::user("hi")];
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            temperature: 0.0,
            response_format: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("response_format").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_request_includes_json_schema_format() {
        let messages = vec![ChatMessage::user("hi")];
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            temperature: 0.0,
            response_format: Some(ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: "queries".to_string(),
                    strict: true,
                    schema: serde_json::json!({"type": "object"}),
                },
            }),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response_format"]["type"], "json_schema");
        assert_eq!(json["response_format"]["json_schema"]["name"], "queries");
        assert_eq!(json["response_format"]["json_schema"]["strict"], true);
    }

    #[test]
    fn test_response_parse_and_text_extraction() {
        let body = r#"{
            "id": "chatcmpl-1",
            "model": "gpt-4o-mini",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "hello"}, "finish_reason": "stop"}
            ]
        }"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        let text = OpenAiClient::extract_text(response).unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_empty_choices_is_empty_response() {
        let response = ChatResponse {
            model: "gpt-4o-mini".to_string(),
            choices: vec![],
        };
        assert!(matches!(
            OpenAiClient::extract_text(response),
            Err(CompletionError::EmptyResponse)
        ));
    }

    #[test]
    fn test_null_content_is_empty_response() {
        let response = ChatResponse {
            model: "gpt-4o-mini".to_string(),
            choices: vec![ChatChoice {
                message: ChatResponseMessage { content: None },
                finish_reason: Some("stop".to_string()),
            }],
        };
        assert!(matches!(
            OpenAiClient::extract_text(response),
            Err(CompletionError::EmptyResponse)
        ));
    }
}
