// Configuration structs

use serde::Deserialize;

use crate::completion::openai::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, REQUEST_TIMEOUT_SECS};
use crate::workflow::DEFAULT_MAX_REVISIONS;

/// Resolved runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// OpenAI API key for completions
    pub openai_api_key: String,

    /// Tavily API key for web search
    pub tavily_api_key: String,

    /// Completion model name (default: gpt-4o-mini)
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature (default: 0.0 for reproducible output)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Revision budget per run (default: 3)
    #[serde(default = "default_max_revisions")]
    pub max_revisions: u32,

    /// Completion request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn new(openai_api_key: String, tavily_api_key: String) -> Self {
        Self {
            openai_api_key,
            tavily_api_key,
            model: default_model(),
            temperature: default_temperature(),
            max_revisions: default_max_revisions(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_revisions() -> u32 {
    DEFAULT_MAX_REVISIONS
}

fn default_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}
