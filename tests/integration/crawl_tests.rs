//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock documentation sites and test
//! the full crawl cycle end-to-end.

use docsift::cache::CacheGateway;
use docsift::config::Config;
use docsift::crawler::{CachedPage, SiteCrawler};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with caching off and short timeouts
fn create_test_config(concurrency: usize) -> Config {
    let mut config = Config::default();
    config.crawler.max_concurrent_fetches = concurrency;
    config.crawler.request_timeout_secs = 5;
    config.cache.enabled = false;
    config
}

/// An HTML page with a title and the given hrefs
fn page(title: &str, hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><main><p>{} page body.</p>{}</main></body></html>",
        title, title, links
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn seed(server: &MockServer) -> Url {
    Url::parse(&format!("{}/", server.uri())).expect("mock server URI parses")
}

#[tokio::test]
async fn test_crawl_respects_depth() {
    let server = MockServer::start().await;

    mount_page(&server, "/", page("Home", &["/a"])).await;
    mount_page(&server, "/a", page("A", &["/b"])).await;
    mount_page(&server, "/b", page("B", &["/c"])).await;

    // depth 3 must never be requested
    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("C", &[])))
        .expect(0)
        .mount(&server)
        .await;

    let crawler = SiteCrawler::new(&create_test_config(2), CacheGateway::disabled()).unwrap();
    let pages = crawler.crawl(&seed(&server), 2, 50).await;

    assert_eq!(pages.len(), 3);
    let base = server.uri();
    assert_eq!(pages[&base].depth, 0);
    assert_eq!(pages[&format!("{}/a", base)].depth, 1);
    assert_eq!(pages[&format!("{}/b", base)].depth, 2);
    assert!(pages.values().all(|p| p.depth <= 2));
}

#[tokio::test]
async fn test_crawl_stays_on_domain() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        page(
            "Home",
            &[
                "/guide",
                "https://elsewhere.example.org/docs",
                "mailto:docs@example.com",
                "javascript:void(0)",
                "#top",
            ],
        ),
    )
    .await;
    mount_page(&server, "/guide", page("Guide", &[])).await;

    let crawler = SiteCrawler::new(&create_test_config(3), CacheGateway::disabled()).unwrap();
    let pages = crawler.crawl(&seed(&server), 3, 50).await;

    let base = server.uri();
    let mut urls: Vec<&String> = pages.keys().collect();
    urls.sort();
    assert_eq!(urls, vec![&base, &format!("{}/guide", base)]);
    assert!(pages.keys().all(|url| url.starts_with(&base)));
    assert_eq!(pages[&format!("{}/guide", base)].title, "Guide");
}

#[tokio::test]
async fn test_trailing_slash_visited_once() {
    let server = MockServer::start().await;

    mount_page(&server, "/", page("Home", &["/x", "/x/", "/y"])).await;
    mount_page(&server, "/y", page("Y", &["/x/", "/x#section"])).await;

    Mock::given(method("GET"))
        .and(path("/x"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("X", &["/"])))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = SiteCrawler::new(&create_test_config(4), CacheGateway::disabled()).unwrap();
    let pages = crawler.crawl(&seed(&server), 3, 50).await;

    assert_eq!(pages.len(), 3);
    assert!(pages.contains_key(&format!("{}/x", server.uri())));
}

#[tokio::test]
async fn test_not_found_page_skipped() {
    let server = MockServer::start().await;

    mount_page(&server, "/", page("Home", &["/missing", "/present"])).await;
    mount_page(&server, "/present", page("Present", &[])).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let crawler = SiteCrawler::new(&create_test_config(2), CacheGateway::disabled()).unwrap();
    let (pages, stats) = crawler.crawl_with_stats(&seed(&server), 2, 50).await;

    let base = server.uri();
    assert_eq!(pages.len(), 2);
    assert!(!pages.contains_key(&format!("{}/missing", base)));
    assert!(pages.contains_key(&format!("{}/present", base)));
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.fetched, 2);
}

#[tokio::test]
async fn test_page_cap_is_soft() {
    let server = MockServer::start().await;

    let hrefs: Vec<String> = (0..10).map(|i| format!("/p{}", i)).collect();
    let href_refs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
    mount_page(&server, "/", page("Home", &href_refs)).await;
    for href in &hrefs {
        mount_page(&server, href, page(href, &[])).await;
    }

    let concurrency = 3;
    let max_pages = 4;
    let crawler =
        SiteCrawler::new(&create_test_config(concurrency), CacheGateway::disabled()).unwrap();
    let (pages, stats) = crawler.crawl_with_stats(&seed(&server), 1, max_pages).await;

    assert!(pages.len() >= max_pages);
    assert!(pages.len() <= max_pages + concurrency);
    assert!(stats.skipped > 0);
}

#[tokio::test]
async fn test_only_first_links_followed() {
    let server = MockServer::start().await;

    let hrefs: Vec<String> = (0..15).map(|i| format!("/p{}", i)).collect();
    let href_refs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
    mount_page(&server, "/", page("Home", &href_refs)).await;
    for href in &hrefs {
        mount_page(&server, href, page(href, &[])).await;
    }

    let crawler = SiteCrawler::new(&create_test_config(5), CacheGateway::disabled()).unwrap();
    let pages = crawler.crawl(&seed(&server), 1, 100).await;

    // seed plus the first ten links
    assert_eq!(pages.len(), 11);
    assert!(pages.contains_key(&format!("{}/p9", server.uri())));
    assert!(!pages.contains_key(&format!("{}/p10", server.uri())));
}

#[tokio::test]
async fn test_cached_page_skips_network() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("Live", &[])))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(2);
    config.cache.enabled = true;
    let cache = CacheGateway::from_config(&config.cache);

    let cached = CachedPage {
        content: "Cached documentation text.".to_string(),
        html: page("Cached", &[]),
        final_url: format!("{}/", base),
        timestamp: 0,
    };
    assert!(cache.set(&CacheGateway::key(&base, "crawl"), &cached, None));

    let crawler = SiteCrawler::new(&config, cache).unwrap();
    let (pages, stats) = crawler.crawl_with_stats(&seed(&server), 2, 10).await;

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[&base].content, "Cached documentation text.");
    assert_eq!(pages[&base].title, "Cached");
    assert_eq!(stats.from_cache, 1);
    assert_eq!(stats.fetched, 0);
}

#[tokio::test]
async fn test_fetched_page_is_cached() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page("Home", &[])))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(1);
    config.cache.enabled = true;
    let cache = CacheGateway::from_config(&config.cache);
    let crawler = SiteCrawler::new(&config, cache.clone()).unwrap();

    let first = crawler.crawl(&seed(&server), 0, 10).await;
    let second = crawler.crawl(&seed(&server), 0, 10).await;
    assert_eq!(first, second);

    let entry: CachedPage = cache
        .get(&CacheGateway::key(&base, "crawl"))
        .expect("page was cached");
    assert!(entry.html.contains("<title>Home</title>"));
    assert!(entry.content.contains("Home page body."));
    assert_eq!(entry.final_url, format!("{}/", base));
}

#[tokio::test]
async fn test_seed_with_trailing_slash_fetched_as_given() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/docs/", page("Docs", &["intro"])).await;
    mount_page(&server, "/docs/intro", page("Intro", &[])).await;

    let crawler = SiteCrawler::new(&create_test_config(2), CacheGateway::disabled()).unwrap();
    let seed = Url::parse(&format!("{}/docs/", base)).unwrap();
    let pages = crawler.crawl(&seed, 1, 10).await;

    let mut urls: Vec<&String> = pages.keys().collect();
    urls.sort();
    assert_eq!(urls, vec![&format!("{}/docs", base), &format!("{}/docs/intro", base)]);
    assert_eq!(pages[&format!("{}/docs/intro", base)].title, "Intro");
}

#[tokio::test]
async fn test_links_resolve_against_redirect_target() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/"))
        .mount(&server)
        .await;
    mount_page(&server, "/docs/", page("Docs", &["intro"])).await;
    mount_page(&server, "/docs/intro", page("Intro", &[])).await;
    Mock::given(method("GET"))
        .and(path("/intro"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&server)
        .await;

    let crawler = SiteCrawler::new(&create_test_config(2), CacheGateway::disabled()).unwrap();
    let seed = Url::parse(&format!("{}/docs", base)).unwrap();
    let (pages, stats) = crawler.crawl_with_stats(&seed, 1, 10).await;

    assert_eq!(pages.len(), 2);
    assert!(pages.contains_key(&format!("{}/docs/intro", base)));
    assert_eq!(stats.failed, 0);
}
