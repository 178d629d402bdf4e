//! Structural parser for crawled pages
//!
//! This module turns one page's markup and extracted text into a
//! [`ParsedPage`]:
//! - Metadata (title, meta description and keywords, breadcrumbs, last-modified)
//! - Structure (headings by level, heading sections, tables, lists)
//! - Topics mentioned in the text
//! - A noise-stripped copy of the content
//!
//! Parsing is pure and synchronous.

mod metadata;
mod structure;
mod topics;

pub use metadata::{extract_breadcrumbs, extract_last_modified, extract_metadata};
pub use structure::{extract_headings, extract_lists, extract_sections, extract_structure, extract_tables};
pub use topics::{clean_documentation_content, extract_topics};

use crate::crawler::PageRecord;
use scraper::Html;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur while parsing a page
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Page {0} has no markup")]
    EmptyMarkup(String),
}

/// Page-level metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    /// Cleaned `<title>` text, empty when missing
    pub title: String,

    /// Cleaned `meta[name=description]` content
    pub description: String,

    /// Cleaned, comma-split `meta[name=keywords]` content
    pub keywords: Vec<String>,

    /// Breadcrumb trail without "home"/"main" entries
    pub breadcrumbs: Vec<String>,

    /// Last-modified hint from a meta tag or the page text
    pub last_modified: Option<String>,
}

/// Text under one heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Heading level, 1 to 6
    pub level: u8,
    pub title: String,
    pub content: String,
    /// Heading `id` attribute, else `section-N`
    pub id: String,
}

/// A table with its header row and body rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// `table-N`, N counting every table in the page
    pub id: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub caption: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// A `ul` or `ol` list and its top-level items
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListBlock {
    /// `list-N`, N counting every list in the page
    pub id: String,
    pub kind: ListKind,
    pub items: Vec<String>,
    /// Nearest preceding heading text, empty if none
    pub parent_heading: String,
}

/// Structural outline of a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageStructure {
    /// Heading level (1 to 6) to cleaned, non-empty heading texts
    pub headings: BTreeMap<u8, Vec<String>>,
    pub sections: Vec<Section>,
    pub tables: Vec<Table>,
    pub lists: Vec<ListBlock>,
}

impl PageStructure {
    /// Headings of one level, empty when the level has none
    pub fn headings_at(&self, level: u8) -> &[String] {
        self.headings.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Parsed representation of one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedPage {
    pub url: String,
    pub metadata: PageMetadata,
    pub structure: PageStructure,
    /// At most 10 topics in order of appearance
    pub topics: Vec<String>,
    pub content: String,
    pub cleaned_content: String,
}

/// Parses one page
///
/// # Arguments
///
/// * `url` - The page's canonical URL
/// * `raw_markup` - The markup as fetched
/// * `content` - The cleaned main text extracted by the crawler
///
/// # Returns
///
/// * `Ok(ParsedPage)` - The parsed page
/// * `Err(ParseError::EmptyMarkup)` - The markup is blank
///
/// # Example
///
/// ```
/// use docsift::parser::parse_page;
///
/// let html = "<html><head><title>Guide</title></head><body><h1>Setup</h1><p>Run it.</p></body></html>";
/// let page = parse_page("https://example.com/guide", html, "Run it.").unwrap();
/// assert_eq!(page.metadata.title, "Guide");
/// assert_eq!(page.structure.headings_at(1), ["Setup"]);
/// ```
pub fn parse_page(url: &str, raw_markup: &str, content: &str) -> Result<ParsedPage, ParseError> {
    if raw_markup.trim().is_empty() {
        return Err(ParseError::EmptyMarkup(url.to_string()));
    }

    let document = Html::parse_document(raw_markup);

    Ok(ParsedPage {
        url: url.to_string(),
        metadata: extract_metadata(&document),
        structure: extract_structure(&document),
        topics: extract_topics(content),
        content: content.to_string(),
        cleaned_content: clean_documentation_content(content),
    })
}

/// Parses every crawled page, skipping pages that fail
///
/// Pages come back in the map's (URL) order.
pub fn parse_pages(pages: &BTreeMap<String, PageRecord>) -> Vec<ParsedPage> {
    let mut parsed = Vec::with_capacity(pages.len());

    for (url, page) in pages {
        match parse_page(url, &page.raw_markup, &page.content) {
            Ok(p) => parsed.push(p),
            Err(e) => tracing::error!("Error parsing {}: {}", url, e),
        }
    }

    tracing::debug!("Parsed {} of {} pages", parsed.len(), pages.len());
    parsed
}
