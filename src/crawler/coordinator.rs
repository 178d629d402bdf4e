//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates:
//! - A fixed pool of fetch workers pulling from one shared frontier
//! - Cache lookups before each network fetch
//! - Content and link extraction for every fetched page
//! - Collecting page records and crawl statistics
//!
//! Workers share a single mutex-guarded [`CrawlState`]. The lock is only held
//! for bookkeeping, never across a fetch.

use crate::cache::CacheGateway;
use crate::config::{Config, CrawlerConfig, ParserConfig};
use crate::crawler::extract::{extract_meaningful_content, extract_page};
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchError};
use crate::crawler::scheduler::{Claim, QueuedUrl, Scheduler};
use crate::crawler::{CrawlStats, PageRecord};
use crate::url::extract_domain;
use crate::DocsiftError;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;
use tokio::task::JoinSet;
use url::Url;

/// Cache prefix for crawled pages
const CACHE_PREFIX: &str = "crawl";

/// What the crawler stores in the cache for each page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedPage {
    pub content: String,
    pub html: String,
    /// URL the markup was served from after redirects; empty in entries
    /// written before it was recorded
    #[serde(default)]
    pub final_url: String,
    /// Unix timestamp (seconds) of the fetch
    pub timestamp: i64,
}

/// Page body and extracted content for one fetched URL
struct FetchedPage {
    content: String,
    html: String,
    /// Base for resolving the page's relative links
    base_url: Url,
    from_cache: bool,
}

/// Mutable crawl state shared by the workers
struct CrawlState {
    scheduler: Scheduler,
    results: BTreeMap<String, PageRecord>,
    stats: CrawlStats,
}

/// Everything a worker needs, shared behind one `Arc`
struct CrawlContext {
    client: Client,
    cache: CacheGateway,
    parser: ParserConfig,
    base_domain: String,
    max_links_per_page: usize,
    state: Mutex<CrawlState>,
    wake: Notify,
}

impl CrawlContext {
    fn lock(&self) -> MutexGuard<'_, CrawlState> {
        // a worker panicking mid-update leaves the state usable
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Crawls one documentation site breadth-first
///
/// A crawler owns its HTTP client and cache gateway and can run several
/// crawls; each call to [`SiteCrawler::crawl`] starts with an empty visited
/// set.
#[derive(Debug, Clone)]
pub struct SiteCrawler {
    client: Client,
    cache: CacheGateway,
    crawler: CrawlerConfig,
    parser: ParserConfig,
}

impl SiteCrawler {
    /// Creates a crawler from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The full configuration; crawler and parser sections are used
    /// * `cache` - Cache gateway consulted before every fetch
    ///
    /// # Returns
    ///
    /// * `Ok(SiteCrawler)` - Ready to crawl
    /// * `Err(DocsiftError)` - The HTTP client could not be built
    pub fn new(config: &Config, cache: CacheGateway) -> Result<Self, DocsiftError> {
        let client = build_http_client(&config.crawler)?;

        Ok(Self {
            client,
            cache,
            crawler: config.crawler.clone(),
            parser: config.parser.clone(),
        })
    }

    /// Crawls from `seed` and returns the collected pages keyed by canonical URL
    ///
    /// Pages deeper than `max_depth` are never fetched. Once `max_pages` pages
    /// are collected no new fetch starts, but fetches already in flight still
    /// complete, so the result may hold up to `max_pages + concurrency - 1`
    /// pages. Pages that fail to fetch are logged and left out.
    pub async fn crawl(
        &self,
        seed: &Url,
        max_depth: u32,
        max_pages: usize,
    ) -> BTreeMap<String, PageRecord> {
        self.crawl_with_stats(seed, max_depth, max_pages).await.0
    }

    /// Same as [`SiteCrawler::crawl`], also returning crawl statistics
    pub async fn crawl_with_stats(
        &self,
        seed: &Url,
        max_depth: u32,
        max_pages: usize,
    ) -> (BTreeMap<String, PageRecord>, CrawlStats) {
        let Some(base_domain) = extract_domain(seed) else {
            tracing::warn!("Seed URL {} has no host; nothing to crawl", seed);
            return (BTreeMap::new(), CrawlStats::default());
        };

        let mut scheduler = Scheduler::new(max_depth, max_pages);
        scheduler.add_to_frontier(seed, 0);

        let context = Arc::new(CrawlContext {
            client: self.client.clone(),
            cache: self.cache.clone(),
            parser: self.parser.clone(),
            base_domain,
            max_links_per_page: self.crawler.max_links_per_page,
            state: Mutex::new(CrawlState {
                scheduler,
                results: BTreeMap::new(),
                stats: CrawlStats::default(),
            }),
            wake: Notify::new(),
        });

        let workers = self.crawler.max_concurrent_fetches.max(1);
        tracing::info!(
            "Crawling {} (max depth {}, max pages {}, {} workers)",
            seed,
            max_depth,
            max_pages,
            workers
        );

        let mut tasks = JoinSet::new();
        for worker_id in 0..workers {
            tasks.spawn(run_worker(worker_id, Arc::clone(&context)));
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Crawl worker failed: {}", e);
            }
        }

        let mut state = context.lock();
        let results = std::mem::take(&mut state.results);
        let mut stats = state.stats.clone();
        stats.skipped = state.scheduler.skipped();
        stats.pages_collected = results.len();

        tracing::info!(
            "Crawl finished: {} pages ({} fetched, {} from cache, {} failed, {} skipped)",
            stats.pages_collected,
            stats.fetched,
            stats.from_cache,
            stats.failed,
            stats.skipped
        );

        (results, stats)
    }
}

/// Pulls URLs from the shared frontier until the crawl is done
async fn run_worker(worker_id: usize, context: Arc<CrawlContext>) {
    loop {
        // register for wakeups before releasing the lock so none are missed
        let woken = context.wake.notified();

        let claim = {
            let mut state = context.lock();
            let collected = state.results.len();
            state.scheduler.claim(collected)
        };

        let queued = match claim {
            Claim::Fetch(queued) => queued,
            Claim::Wait => {
                woken.await;
                continue;
            }
            Claim::Done => {
                tracing::trace!("Worker {} finished", worker_id);
                context.wake.notify_waiters();
                return;
            }
        };

        tracing::debug!(
            "Worker {} fetching {} (depth {})",
            worker_id,
            queued.canonical,
            queued.depth
        );

        let outcome = fetch_page(&context, &queued).await;
        record_outcome(&context, queued, outcome);
        context.wake.notify_waiters();
    }
}

/// Fetches one page, reading through the cache
///
/// The queued URL is requested as discovered. The canonical form is only
/// the cache key.
async fn fetch_page(context: &CrawlContext, queued: &QueuedUrl) -> Result<FetchedPage, FetchError> {
    let cache_key = CacheGateway::key(&queued.canonical, CACHE_PREFIX);

    if let Some(cached) = context.cache.get::<CachedPage>(&cache_key) {
        tracing::debug!("Cache hit for {}", queued.canonical);
        return Ok(FetchedPage {
            base_url: base_url(&cached.final_url, &queued.url),
            content: cached.content,
            html: cached.html,
            from_cache: true,
        });
    }

    let (final_url, html) = fetch_url(&context.client, queued.url.as_str())
        .await
        .into_body()?;
    let content = extract_meaningful_content(&html, &context.parser);

    let entry = CachedPage {
        content,
        html,
        final_url,
        timestamp: Utc::now().timestamp(),
    };
    context.cache.set(&cache_key, &entry, None);

    Ok(FetchedPage {
        base_url: base_url(&entry.final_url, &queued.url),
        content: entry.content,
        html: entry.html,
        from_cache: false,
    })
}

/// The URL relative links resolve against, falling back to the requested one
fn base_url(final_url: &str, requested: &Url) -> Url {
    Url::parse(final_url).unwrap_or_else(|_| requested.clone())
}

/// Stores a finished fetch and queues its links
fn record_outcome(
    context: &CrawlContext,
    queued: QueuedUrl,
    outcome: Result<FetchedPage, FetchError>,
) {
    let page = match outcome {
        Ok(page) => Some(page),
        Err(e) => {
            tracing::warn!("Error fetching {}: {}", queued.canonical, e);
            None
        }
    };

    // extraction happens before taking the lock
    let extract = page
        .as_ref()
        .map(|p| extract_page(&p.html, &p.base_url, &context.base_domain));

    let mut state = context.lock();
    state.scheduler.complete();

    let (Some(page), Some(extract)) = (page, extract) else {
        state.stats.failed += 1;
        return;
    };

    if page.from_cache {
        state.stats.from_cache += 1;
    } else {
        state.stats.fetched += 1;
    }

    if queued.depth < state.scheduler.max_depth() {
        for link in extract.links.iter().take(context.max_links_per_page) {
            match Url::parse(link) {
                Ok(url) => {
                    state.scheduler.add_to_frontier(&url, queued.depth + 1);
                }
                Err(e) => tracing::debug!("Dropping link {}: {}", link, e),
            }
        }
    }

    let record = PageRecord {
        url: queued.canonical.clone(),
        content: page.content,
        raw_markup: page.html,
        depth: queued.depth,
        title: extract.title,
    };
    state.results.insert(queued.canonical, record);
}
