use crate::config::types::{AnalyzerConfig, CacheConfig, Config, CrawlerConfig, ParserConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_parser_config(&config.parser)?;
    validate_analyzer_config(&config.analyzer)?;
    validate_cache_config(&config.cache)?;
    validate_base_url("llm.base-url", &config.llm.base_url)?;
    validate_base_url("embedding.base-url", &config.embedding.base_url)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 100, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every configured selector compiles
fn validate_parser_config(config: &ParserConfig) -> Result<(), ConfigError> {
    for selector in config
        .content_selectors
        .iter()
        .chain(config.ignore_selectors.iter())
    {
        if Selector::parse(selector).is_err() {
            return Err(ConfigError::Validation(format!(
                "invalid CSS selector '{}'",
                selector
            )));
        }
    }
    Ok(())
}

/// Validates analyzer configuration
fn validate_analyzer_config(config: &AnalyzerConfig) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&config.similarity_threshold) {
        return Err(ConfigError::Validation(format!(
            "similarity_threshold must be between 0 and 1, got {}",
            config.similarity_threshold
        )));
    }

    if config.max_submodules < 1 {
        return Err(ConfigError::Validation(format!(
            "max_submodules must be >= 1, got {}",
            config.max_submodules
        )));
    }

    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.ttl_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "cache ttl_secs must be >= 1, got {}",
            config.ttl_secs
        )));
    }
    Ok(())
}

/// Validates a backend base URL
fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", field, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            field, value
        )));
    }

    Ok(())
}
