// Configuration loader
// Loads API keys from ~/.terragen/config.toml or environment variables

use anyhow::{bail, Context, Result};
use std::fs;

use super::settings::Config;

/// Load configuration from the terragen config file or environment
pub fn load_config() -> Result<Config> {
    // Try loading from ~/.terragen/config.toml first
    if let Some(config) = try_load_from_config_file()? {
        return Ok(config);
    }

    // Fall back to environment variables
    let openai_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
    let tavily_key = std::env::var("TAVILY_API_KEY").unwrap_or_default();
    if !openai_key.is_empty() && !tavily_key.is_empty() {
        return Ok(Config::new(openai_key, tavily_key));
    }

    // No config found - explain how to set one up
    bail!(
        "No configuration found. Create ~/.terragen/config.toml:\n\n\
        openai_api_key = \"sk-...\"\n\
        tavily_api_key = \"tvly-...\"\n\n\
        Optional settings:\n\
        model = \"gpt-4o-mini\"\n\
        temperature = 0.0\n\
        max_revisions = 3\n\n\
        Alternatively, set environment variables:\n\
        export OPENAI_API_KEY=\"sk-...\"\n\
        export TAVILY_API_KEY=\"tvly-...\""
    );
}

fn try_load_from_config_file() -> Result<Option<Config>> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let config_path = home.join(".terragen/config.toml");

    if !config_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    let config = parse_config(&contents)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;

    Ok(Some(config))
}

fn parse_config(contents: &str) -> Result<Config> {
    let config: Config = toml::from_str(contents)?;

    if config.openai_api_key.is_empty() {
        bail!("Config is missing openai_api_key");
    }
    if config.tavily_api_key.is_empty() {
        bail!("Config is missing tavily_api_key");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::DEFAULT_MAX_REVISIONS;

    #[test]
    fn test_parse_minimal_config_applies_defaults() {
        let config = parse_config(
            r#"
            openai_api_key = "sk-test"
            tavily_api_key = "tvly-test"
            "#,
        )
        .unwrap();
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.tavily_api_key, "tvly-test");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_revisions, DEFAULT_MAX_REVISIONS);
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn test_parse_full_config_overrides_defaults() {
        let config = parse_config(
            r#"
            openai_api_key = "sk-test"
            tavily_api_key = "tvly-test"
            model = "gpt-4o"
            temperature = 0.2
            max_revisions = 5
            request_timeout_secs = 120
            "#,
        )
        .unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_revisions, 5);
        assert_eq!(config.request_timeout_secs, 120);
    }

    #[test]
    fn test_missing_keys_are_rejected() {
        assert!(parse_config(r#"tavily_api_key = "tvly-test""#).is_err());
        assert!(parse_config(
            r#"
            openai_api_key = ""
            tavily_api_key = "tvly-test"
            "#
        )
        .is_err());
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        assert!(parse_config("openai_api_key = ").is_err());
    }
}
