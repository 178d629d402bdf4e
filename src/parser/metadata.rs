//! Page metadata extraction

use super::PageMetadata;
use crate::text::clean_text;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

/// Breadcrumb containers, tried in order; the first present one wins
const BREADCRUMB_SELECTORS: &[&str] = &[
    ".breadcrumb",
    ".breadcrumbs",
    ".bc",
    "[aria-label=\"breadcrumb\"]",
    ".nav-path",
];

/// Breadcrumb entries that carry no information
const BREADCRUMB_SKIP: &[&str] = &["home", "main"];

fn last_modified_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)last\s*(?:updated|modified)[:\s]*([\w\s,]+)",
            r"(?i)updated\s*:\s*([\w\s,]+)",
            r"(?i)version.*(\d{4}[-/]\d{1,2}[-/]\d{1,2})",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("last-modified regex is valid"))
        .collect()
    })
}

/// Extracts title, meta tags, breadcrumbs and last-modified hint
pub fn extract_metadata(document: &Html) -> PageMetadata {
    PageMetadata {
        title: select_first_text(document, "title").unwrap_or_default(),
        description: meta_content(document, "description")
            .map(|d| clean_text(&d))
            .unwrap_or_default(),
        keywords: meta_content(document, "keywords")
            .map(|k| {
                k.split(',')
                    .map(clean_text)
                    .filter(|k| !k.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        breadcrumbs: extract_breadcrumbs(document),
        last_modified: extract_last_modified(document),
    }
}

/// Extracts the breadcrumb trail
///
/// Only the first container found (in selector priority order) is used.
/// Every `li`, `span` and `a` inside it contributes its cleaned text, nested
/// ones included.
pub fn extract_breadcrumbs(document: &Html) -> Vec<String> {
    let Ok(item_selector) = Selector::parse("li, span, a") else {
        return Vec::new();
    };

    for selector in BREADCRUMB_SELECTORS {
        let Ok(container_selector) = Selector::parse(selector) else {
            continue;
        };

        if let Some(container) = document.select(&container_selector).next() {
            return container
                .select(&item_selector)
                .map(|item| clean_text(&item.text().collect::<String>()))
                .filter(|text| {
                    !text.is_empty() && !BREADCRUMB_SKIP.contains(&text.to_lowercase().as_str())
                })
                .collect();
        }
    }

    Vec::new()
}

/// Finds a last-modified date
///
/// `meta[name=last-modified]` wins; otherwise the first pattern that matches
/// anywhere in the document text supplies the trimmed capture.
pub fn extract_last_modified(document: &Html) -> Option<String> {
    if let Some(date) = meta_content(document, "last-modified") {
        return Some(date);
    }

    let all_text: String = document.root_element().text().collect();
    last_modified_patterns().iter().find_map(|pattern| {
        pattern
            .captures(&all_text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    })
}

fn meta_content(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!("meta[name=\"{}\"]", name)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

fn select_first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| clean_text(&element.text().collect::<String>()))
}
