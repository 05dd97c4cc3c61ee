// HTTP client for the Tavily search API

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{SearchClient, SearchError, SearchResult};

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub struct TavilyClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    /// Override the API base URL (testing and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl SearchClient for TavilyClient {
    async fn search(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let request = TavilyRequest {
            query,
            max_results,
            search_depth: "basic",
            topic: "general",
        };

        tracing::debug!(query, max_results, "sending search request");

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout
                } else if e.is_connect() {
                    SearchError::Connection(e.to_string())
                } else {
                    SearchError::Network(e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => SearchError::Unauthorized,
                429 => SearchError::RateLimited,
                400 => SearchError::BadRequest(error_body),
                500..=599 => SearchError::ServerError(status.as_u16(), error_body),
                _ => SearchError::HttpError(status.as_u16(), error_body),
            });
        }

        let tavily_response: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        tracing::debug!(
            query,
            results = tavily_response.results.len(),
            "search response received"
        );

        Ok(tavily_response
            .results
            .into_iter()
            .map(|r| SearchResult {
                title: r.title,
                url: r.url,
                content: r.content,
                score: r.score,
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    max_results: u32,
    search_depth: &'static str,
    topic: &'static str,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: String,
    url: String,
    content: String,
    score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = TavilyRequest {
            query: "Terraform aws_s3_bucket",
            max_results: 2,
            search_depth: "basic",
            topic: "general",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["query"], "Terraform aws_s3_bucket");
        assert_eq!(json["max_results"], 2);
        assert_eq!(json["search_depth"], "basic");
    }

    #[test]
    fn test_response_parse() {
        let body = r#"{
            "results": [
                {"title": "S3 bucket resource", "url": "https://registry.terraform.io", "content": "resource docs", "score": 0.97},
                {"title": "AWS provider", "url": "https://aws.amazon.com", "content": "provider docs", "score": null}
            ]
        }"#;
        let response: TavilyResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].content, "resource docs");
        assert!(response.results[1].score.is_none());
    }

    #[test]
    fn test_builder() {
        let client = TavilyClient::new("key")
            .with_base_url("http://localhost:1234")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(client.base_url, "http://localhost:1234");
        assert_eq!(client.timeout, Duration::from_secs(5));
    }
}
