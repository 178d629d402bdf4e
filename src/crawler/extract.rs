//! HTML extraction for crawled pages
//!
//! This module handles pulling out of fetched markup:
//! - Links to follow (same-domain `<a href>` targets)
//! - The page title
//! - The meaningful text content, with navigation and chrome skipped
//!
//! Everything here is synchronous. `scraper::Html` is not `Send`, so callers
//! inside spawned tasks must finish with the document before the next
//! `.await`.

use crate::config::ParserConfig;
use crate::text::clean_text;
use crate::url::{canonicalize, is_internal_link};
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracted information from a fetched page
#[derive(Debug, Clone)]
pub struct PageExtract {
    /// Cleaned `<title>` text, or "Untitled"
    pub title: String,

    /// Absolute same-domain links in first-appearance order, one per
    /// canonical URL
    pub links: Vec<String>,
}

/// Parses markup and extracts the title and followable links
///
/// # Arguments
///
/// * `html` - The page markup
/// * `page_url` - The URL the markup was served from (after redirects), used
///   to resolve relative links
/// * `base_domain` - Domain (host plus explicit port) links must match
///
/// # Example
///
/// ```
/// use docsift::crawler::extract_page;
/// use url::Url;
///
/// let html = r#"<html><head><title>Guide</title></head><body><a href="/intro">Intro</a></body></html>"#;
/// let page_url = Url::parse("https://example.com/guide").unwrap();
/// let extract = extract_page(html, &page_url, "example.com");
/// assert_eq!(extract.title, "Guide");
/// assert_eq!(extract.links, vec!["https://example.com/intro"]);
/// ```
pub fn extract_page(html: &str, page_url: &Url, base_domain: &str) -> PageExtract {
    let document = Html::parse_document(html);

    PageExtract {
        title: extract_title(&document),
        links: extract_links(&document, page_url, base_domain),
    }
}

/// Extracts the cleaned page title, "Untitled" when there is no `<title>`
pub fn extract_title(document: &Html) -> String {
    let Ok(title_selector) = Selector::parse("title") else {
        return "Untitled".to_string();
    };

    document
        .select(&title_selector)
        .next()
        .map(|element| clean_text(&element.text().collect::<String>()))
        .unwrap_or_else(|| "Untitled".to_string())
}

/// Extracts the same-domain links of a document
///
/// Links are resolved against `page_url` and returned without their
/// fragment. Links sharing a canonical URL are deduplicated keeping the first
/// spelling. Fragment-only and `javascript:` hrefs are dropped, as is
/// anything that resolves outside `base_domain`.
pub fn extract_links(document: &Html, page_url: &Url, base_domain: &str) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(mut absolute) = resolve_link(href, page_url) else {
            continue;
        };

        if !is_internal_link(&absolute, base_domain) {
            continue;
        }

        if let Ok(canonical) = canonicalize(&absolute) {
            if seen.insert(canonical) {
                absolute.set_fragment(None);
                links.push(absolute.to_string());
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - Empty and fragment-only hrefs
/// - `javascript:` hrefs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, page_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    match page_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url)
        }
        _ => None,
    }
}

/// Extracts the main text of a page
///
/// Text inside any ignore selector is skipped wherever it appears. Every
/// element matching a content selector contributes its text when that text
/// is longer than `min_content_length` characters; nested matches contribute
/// again. With no qualifying block the whole `<body>` text is used. Pieces
/// are joined with spaces and cleaned.
///
/// # Arguments
///
/// * `html` - The page markup
/// * `config` - Parser configuration (selectors and minimum block length)
pub fn extract_meaningful_content(html: &str, config: &ParserConfig) -> String {
    let document = Html::parse_document(html);
    let ignore = parse_selectors(&config.ignore_selectors);

    let mut blocks = Vec::new();
    for selector in parse_selectors(&config.content_selectors) {
        for element in document.select(&selector) {
            let text = visible_text(element, &ignore);
            if text.chars().count() > config.min_content_length {
                blocks.push(text);
            }
        }
    }

    if blocks.is_empty() {
        if let Ok(body_selector) = Selector::parse("body") {
            if let Some(body) = document.select(&body_selector).next() {
                blocks.push(visible_text(body, &ignore));
            }
        }
    }

    clean_text(&blocks.join(" "))
}

fn parse_selectors(selectors: &[String]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| match Selector::parse(s) {
            Ok(selector) => Some(selector),
            Err(e) => {
                tracing::warn!("Ignoring invalid selector {:?}: {:?}", s, e);
                None
            }
        })
        .collect()
}

/// Text of `element` with ignored subtrees, scripts and styles left out
fn visible_text(element: ElementRef<'_>, ignore: &[Selector]) -> String {
    let mut parts = Vec::new();

    for node in element.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().filter_map(ElementRef::wrap).any(|ancestor| {
            matches!(ancestor.value().name(), "script" | "style" | "noscript")
                || ignore.iter().any(|selector| selector.matches(&ancestor))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}
