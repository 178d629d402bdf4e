use serde::Deserialize;

/// Main configuration structure for Docsift
///
/// Every section and field has a default, so an empty TOML document (or no
/// file at all) yields the stock settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub parser: ParserConfig,
    pub analyzer: AnalyzerConfig,
    pub cache: CacheConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum link distance from the seed URL
    pub max_depth: u32,

    /// Soft cap on the number of pages kept per site
    pub max_pages: usize,

    /// Maximum number of simultaneous page fetches
    pub max_concurrent_fetches: usize,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Number of discovered links followed per page
    pub max_links_per_page: usize,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_pages: 50,
            max_concurrent_fetches: 5,
            request_timeout_secs: 30,
            max_links_per_page: 10,
            user_agent: "Mozilla/5.0 (compatible; DocumentationExtractor/1.0)".to_string(),
        }
    }
}

/// Content extraction settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParserConfig {
    /// Minimum text length for a content block to be kept
    pub min_content_length: usize,

    /// Selectors whose text is treated as page content
    pub content_selectors: Vec<String>,

    /// Selectors whose text is dropped before extraction
    pub ignore_selectors: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_content_length: 100,
            content_selectors: [
                "article",
                "main",
                "section",
                "div.content",
                "div.documentation",
                "div.help-content",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            ignore_selectors: [
                "nav",
                "footer",
                "header",
                "aside",
                ".sidebar",
                ".navigation",
                ".advertisement",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Module analysis settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnalyzerConfig {
    /// Minimum content size for a module (reserved, not consulted by the analyzer)
    pub min_module_content_size: usize,

    /// Similarity threshold for clustering (reserved, the DBSCAN radius is fixed)
    pub similarity_threshold: f64,

    /// Maximum number of submodules kept per module
    pub max_submodules: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_module_content_size: 500,
            similarity_threshold: 0.7,
            max_submodules: 10,
        }
    }
}

/// Crawl cache settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CacheConfig {
    /// Whether crawled pages are read from and written to the cache
    pub enabled: bool,

    /// Time-to-live for cache entries in seconds
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 3600,
        }
    }
}

/// Generative description backend settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LlmConfig {
    pub enabled: bool,
    pub model: String,
    pub temperature: f32,
    pub base_url: String,

    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: "gpt-4-turbo-preview".to_string(),
            temperature: 0.1,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

/// Text embedding backend settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EmbeddingConfig {
    pub enabled: bool,
    pub model: String,
    pub base_url: String,

    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.max_pages, 50);
        assert_eq!(config.crawler.max_concurrent_fetches, 5);
        assert_eq!(config.crawler.request_timeout_secs, 30);
        assert_eq!(config.parser.min_content_length, 100);
        assert_eq!(config.analyzer.max_submodules, 10);
        assert!((config.analyzer.similarity_threshold - 0.7).abs() < f64::EPSILON);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert!(!config.llm.enabled);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.crawler.max_pages, 50);
        assert_eq!(config.parser.content_selectors.len(), 6);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[crawler]\nmax-depth = 1\n").unwrap();
        assert_eq!(config.crawler.max_depth, 1);
        assert_eq!(config.crawler.max_pages, 50);
    }
}
