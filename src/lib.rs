//! Docsift: a documentation module extractor
//!
//! This crate crawls a documentation site, parses each page into structured
//! metadata, and groups related page sections into modules and submodules with
//! generated descriptions and confidence scores.

pub mod analyzer;
pub mod cache;
pub mod config;
pub mod crawler;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod text;
pub mod url;

use thiserror::Error;

/// Main error type for Docsift operations
#[derive(Debug, Error)]
pub enum DocsiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No pages could be crawled from {url}")]
    EmptyCrawl { url: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Docsift operations
pub type Result<T> = std::result::Result<T, DocsiftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use analyzer::{Module, ModuleAnalyzer};
pub use config::Config;
pub use crawler::{PageRecord, SiteCrawler};
pub use parser::ParsedPage;
pub use pipeline::{AnalysisReport, Pipeline};
pub use crate::url::{canonicalize_url, extract_domain, prepare_seed_url};
