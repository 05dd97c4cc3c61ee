// Web-search interface for grounding generation in current documentation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod tavily;

pub use tavily::TavilyClient;

/// One search hit. The workflow only consumes `content`; title, url and
/// score ride along for logging and presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
    pub score: Option<f64>,
}

/// Typed errors from search providers
#[derive(Debug, Error)]
pub enum SearchError {
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

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("HTTP error ({0}): {1}")]
    HttpError(u16, String),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Search provider seam. Returns results in provider order; never retried.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<SearchResult>, SearchError>;
}
