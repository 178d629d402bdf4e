//! Candidate extraction from parsed pages

use super::types::{CandidateSource, ModuleCandidate};
use crate::parser::ParsedPage;

/// Names this short (after trimming) never become candidates
const MIN_NAME_LEN: usize = 3;

fn long_enough(name: &str) -> bool {
    name.trim().chars().count() > MIN_NAME_LEN
}

/// Collects module candidates from every page
///
/// Per page, in page order: the title, then h1, h2 and h3 headings in
/// document order, then breadcrumbs. Heading candidates carry the content of
/// the first section whose title matches case-insensitively, falling back to
/// the page content.
pub fn extract_candidates(pages: &[ParsedPage]) -> Vec<ModuleCandidate> {
    let mut candidates = Vec::new();

    for page in pages {
        let title = &page.metadata.title;
        if long_enough(title) {
            candidates.push(ModuleCandidate {
                name: title.clone(),
                source: CandidateSource::Title,
                content: page.content.clone(),
                url: page.url.clone(),
            });
        }

        for level in 1..=3u8 {
            for heading in page.structure.headings_at(level) {
                if !long_enough(heading) {
                    continue;
                }
                candidates.push(ModuleCandidate {
                    name: heading.clone(),
                    source: CandidateSource::Heading(level),
                    content: section_content(heading, page).to_string(),
                    url: page.url.clone(),
                });
            }
        }

        for (index, crumb) in page.metadata.breadcrumbs.iter().enumerate() {
            if !long_enough(crumb) {
                continue;
            }
            candidates.push(ModuleCandidate {
                name: crumb.clone(),
                source: CandidateSource::Breadcrumb(index),
                content: page.content.clone(),
                url: page.url.clone(),
            });
        }
    }

    tracing::debug!("Extracted {} module candidates", candidates.len());
    candidates
}

fn section_content<'a>(heading: &str, page: &'a ParsedPage) -> &'a str {
    let wanted = heading.to_lowercase();
    page.structure
        .sections
        .iter()
        .find(|section| section.title.to_lowercase() == wanted)
        .map(|section| section.content.as_str())
        .unwrap_or(page.content.as_str())
}

/// Joins every page's title and content into one text
pub fn build_corpus(pages: &[ParsedPage]) -> String {
    pages
        .iter()
        .flat_map(|page| [page.metadata.title.as_str(), page.content.as_str()])
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_page;

    fn page() -> ParsedPage {
        let html = r#"
            <html>
            <head><title>Getting Started</title></head>
            <body>
                <nav class="breadcrumb"><a>Home</a><a>Docs</a><a>Tutorials</a></nav>
                <h1>Intro</h1>
                <h2>Installation</h2>
                <p>Installation includes downloading and configuring.</p>
                <h3>FAQ</h3>
            </body>
            </html>
        "#;
        parse_page("https://example.com/start", html, "Whole page text.").unwrap()
    }

    #[test]
    fn test_candidate_order_and_sources() {
        let candidates = extract_candidates(&[page()]);
        let summary: Vec<(&str, CandidateSource)> = candidates
            .iter()
            .map(|c| (c.name.as_str(), c.source))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Getting Started", CandidateSource::Title),
                ("Intro", CandidateSource::Heading(1)),
                ("Installation", CandidateSource::Heading(2)),
                ("Docs", CandidateSource::Breadcrumb(0)),
                ("Tutorials", CandidateSource::Breadcrumb(1)),
            ]
        );
    }

    #[test]
    fn test_heading_content_from_section() {
        let candidates = extract_candidates(&[page()]);
        let install = candidates.iter().find(|c| c.name == "Installation").unwrap();
        assert_eq!(
            install.content,
            "Installation includes downloading and configuring."
        );
        assert_eq!(install.url, "https://example.com/start");

        let title = &candidates[0];
        assert_eq!(title.content, "Whole page text.");
    }

    #[test]
    fn test_short_names_filtered() {
        let candidates = extract_candidates(&[page()]);
        // "FAQ" is too short
        assert!(candidates.iter().all(|c| c.name.trim().chars().count() > 3));
    }

    #[test]
    fn test_corpus_joins_title_and_content() {
        assert_eq!(build_corpus(&[page()]), "Getting Started Whole page text.");
        assert_eq!(build_corpus(&[]), "");
    }
}
