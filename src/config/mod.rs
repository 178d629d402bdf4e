//! Configuration module for Docsift
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! The resulting [`Config`] is immutable once a run starts; command-line
//! overrides are applied at the entry point before anything is crawled.
//!
//! # Example
//!
//! ```no_run
//! use docsift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("docsift.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AnalyzerConfig, CacheConfig, Config, CrawlerConfig, EmbeddingConfig, LlmConfig, ParserConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
