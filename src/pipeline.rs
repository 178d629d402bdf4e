//! End-to-end extraction: crawl, parse, analyze
//!
//! A [`Pipeline`] is built once from configuration and can process any
//! number of seed URLs. Each run is independent and returns an
//! [`AnalysisReport`].

use crate::analyzer::{Module, ModuleAnalyzer};
use crate::cache::CacheGateway;
use crate::config::Config;
use crate::crawler::{CrawlStats, SiteCrawler};
use crate::parser::parse_pages;
use crate::url::prepare_seed_url;
use crate::{DocsiftError, Result};
use chrono::Utc;
use serde::Serialize;
use std::time::Instant;

/// Outcome of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Seed URL after scheme completion
    pub seed_url: String,
    pub modules: Vec<Module>,
    pub pages_crawled: usize,
    pub crawl_stats: CrawlStats,
    /// RFC 3339 time the run finished
    pub extracted_at: String,
    pub duration_ms: u64,
}

/// Crawler and analyzer wired together
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    crawler: SiteCrawler,
    analyzer: ModuleAnalyzer,
}

impl Pipeline {
    /// Builds a pipeline with the cache and capabilities `config` enables
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Ready to run
    /// * `Err(DocsiftError)` - The HTTP client could not be built
    pub fn from_config(config: Config) -> Result<Self> {
        let cache = CacheGateway::from_config(&config.cache);
        Self::with_cache(config, cache)
    }

    /// Builds a pipeline around an existing cache gateway
    pub fn with_cache(config: Config, cache: CacheGateway) -> Result<Self> {
        let crawler = SiteCrawler::new(&config, cache)?;
        let analyzer = ModuleAnalyzer::from_config(&config);
        Ok(Self {
            config,
            crawler,
            analyzer,
        })
    }

    /// Replaces the analyzer, keeping the crawler
    pub fn with_analyzer(mut self, analyzer: ModuleAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extracts modules from the site at `seed`
    ///
    /// # Arguments
    ///
    /// * `seed` - Seed URL; `https://` is added when the scheme is missing
    ///
    /// # Returns
    ///
    /// * `Ok(AnalysisReport)` - Modules found in the crawled pages
    /// * `Err(DocsiftError)` - The seed is invalid or no page could be crawled
    pub async fn run(&self, seed: &str) -> Result<AnalysisReport> {
        let started = Instant::now();
        let seed_url = prepare_seed_url(seed)?;

        let (pages, crawl_stats) = self
            .crawler
            .crawl_with_stats(
                &seed_url,
                self.config.crawler.max_depth,
                self.config.crawler.max_pages,
            )
            .await;

        if pages.is_empty() {
            return Err(DocsiftError::EmptyCrawl {
                url: seed_url.to_string(),
            });
        }

        let parsed = parse_pages(&pages);
        tracing::info!("Parsed {} of {} pages", parsed.len(), pages.len());

        let modules = self.analyzer.analyze(&parsed).await;

        Ok(AnalysisReport {
            seed_url: seed_url.to_string(),
            modules,
            pages_crawled: pages.len(),
            crawl_stats,
            extracted_at: Utc::now().to_rfc3339(),
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}
