//! Headings, sections, tables and lists

use super::{ListBlock, ListKind, PageStructure, Section, Table};
use crate::text::clean_text;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

/// Longest text (in characters, exclusive) accepted as an implicit table caption
const MAX_CAPTION_LEN: usize = 200;

fn heading_level(element: &ElementRef<'_>) -> Option<u8> {
    match element.value().name() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn element_text(element: &ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Builds the full structural outline of a document
pub fn extract_structure(document: &Html) -> PageStructure {
    PageStructure {
        headings: extract_headings(document),
        sections: extract_sections(document),
        tables: extract_tables(document),
        lists: extract_lists(document),
    }
}

/// Maps every heading level 1 to 6 to its non-empty cleaned texts
///
/// All six levels are present in the map, possibly with empty lists.
pub fn extract_headings(document: &Html) -> BTreeMap<u8, Vec<String>> {
    let mut headings = BTreeMap::new();

    for level in 1..=6u8 {
        let texts = selector(&format!("h{}", level))
            .map(|sel| {
                document
                    .select(&sel)
                    .map(|h| element_text(&h))
                    .filter(|text| !text.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        headings.insert(level, texts);
    }

    headings
}

/// Splits the document into heading sections
///
/// Each heading collects the cleaned text of its following sibling elements
/// up to the next sibling heading of any level. Sections come out in
/// document order, one per heading, empty ones included.
pub fn extract_sections(document: &Html) -> Vec<Section> {
    let Some(heading_selector) = selector("h1, h2, h3, h4, h5, h6") else {
        return Vec::new();
    };

    document
        .select(&heading_selector)
        .enumerate()
        .filter_map(|(index, heading)| {
            let level = heading_level(&heading)?;

            let content: Vec<String> = heading
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .take_while(|sibling| heading_level(sibling).is_none())
                .map(|sibling| element_text(&sibling))
                .filter(|text| !text.is_empty())
                .collect();

            let id = heading
                .value()
                .attr("id")
                .map(str::to_string)
                .unwrap_or_else(|| format!("section-{}", index));

            Some(Section {
                level,
                title: element_text(&heading),
                content: content.join(" "),
                id,
            })
        })
        .collect()
}

/// Extracts tables that have at least one row
///
/// Headers come from cells inside `thead`. Rows come from `tbody` when
/// present, otherwise from every row of the table (header row included).
pub fn extract_tables(document: &Html) -> Vec<Table> {
    let (Some(table_sel), Some(thead_sel), Some(tbody_sel), Some(tr_sel), Some(cell_sel)) = (
        selector("table"),
        selector("thead"),
        selector("tbody"),
        selector("tr"),
        selector("th, td"),
    ) else {
        return Vec::new();
    };

    let mut tables = Vec::new();

    for (index, table) in document.select(&table_sel).enumerate() {
        let headers: Vec<String> = table
            .select(&thead_sel)
            .next()
            .map(|thead| thead.select(&cell_sel).map(|c| element_text(&c)).collect())
            .unwrap_or_default();

        let body = table.select(&tbody_sel).next().unwrap_or(table);
        let rows: Vec<Vec<String>> = body
            .select(&tr_sel)
            .map(|tr| tr.select(&cell_sel).map(|c| element_text(&c)).collect::<Vec<_>>())
            .filter(|cells| !cells.is_empty())
            .collect();

        if rows.is_empty() {
            continue;
        }

        tables.push(Table {
            id: format!("table-{}", index),
            headers,
            rows,
            caption: table_caption(&table),
        });
    }

    tables
}

/// `<caption>` text, else a short preceding `p`/`div`/`h3`/`h4` sibling
fn table_caption(table: &ElementRef<'_>) -> String {
    if let Some(caption) = selector("caption").and_then(|sel| table.select(&sel).next()) {
        return element_text(&caption);
    }

    table
        .prev_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| matches!(sibling.value().name(), "p" | "div" | "h3" | "h4"))
        .map(|sibling| element_text(&sibling))
        .filter(|text| !text.is_empty() && text.chars().count() < MAX_CAPTION_LEN)
        .unwrap_or_default()
}

/// Extracts lists that have at least one top-level item
///
/// Only direct `li` children count as items. The parent heading is the last
/// heading that starts before the list in document order.
pub fn extract_lists(document: &Html) -> Vec<ListBlock> {
    let mut lists = Vec::new();
    let mut last_heading = String::new();
    let mut index = 0;

    for element in document.root_element().descendants().filter_map(ElementRef::wrap) {
        if heading_level(&element).is_some() {
            last_heading = element_text(&element);
            continue;
        }

        let kind = match element.value().name() {
            "ul" => ListKind::Unordered,
            "ol" => ListKind::Ordered,
            _ => continue,
        };

        let items: Vec<String> = element
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| child.value().name() == "li")
            .map(|li| element_text(&li))
            .collect();

        if !items.is_empty() {
            lists.push(ListBlock {
                id: format!("list-{}", index),
                kind,
                items,
                parent_heading: last_heading.clone(),
            });
        }
        index += 1;
    }

    lists
}
