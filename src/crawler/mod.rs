//! Crawler module for documentation sites
//!
//! This module contains the crawling logic, including:
//! - HTTP fetching and error classification
//! - Title, link and main-content extraction
//! - Frontier scheduling with depth and page limits
//! - Worker-pool crawl coordination with cache read-through

mod coordinator;
mod extract;
mod fetcher;
mod scheduler;

pub use coordinator::{CachedPage, SiteCrawler};
pub use extract::{extract_links, extract_meaningful_content, extract_page, extract_title, PageExtract};
pub use fetcher::{build_http_client, fetch_url, FetchError, FetchResult};
pub use scheduler::{Claim, QueuedUrl, Scheduler};

use serde::Serialize;

/// One successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    /// Canonical URL of the page
    pub url: String,

    /// Cleaned main text
    pub content: String,

    /// Markup exactly as fetched
    #[serde(skip)]
    pub raw_markup: String,

    /// Link distance from the seed
    pub depth: u32,

    /// Cleaned `<title>` text, "Untitled" when missing
    pub title: String,
}

/// Counters gathered during one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Pages fetched over the network
    pub fetched: usize,

    /// Pages served from the cache
    pub from_cache: usize,

    /// Fetches that produced no page (bad status or network error)
    pub failed: usize,

    /// Queued URLs dropped by the depth, page-cap or revisit checks
    pub skipped: usize,

    /// Pages in the final result
    pub pages_collected: usize,
}
