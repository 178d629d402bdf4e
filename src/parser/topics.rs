//! Topic detection and documentation noise removal

use crate::text::title_case;
use regex::Regex;
use std::sync::OnceLock;

const MAX_TOPICS: usize = 10;

fn topic_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"^(?:how to|guide to|tutorial on|understanding)\s+(.+)",
            r"^(?:introduction to|overview of|getting started with)\s+(.+)",
            r"^(?:working with|using|managing|configuring)\s+(.+)",
            r"^(?:best practices for|tips for|troubleshooting)\s+(.+)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("topic regex is valid"))
        .collect()
    })
}

fn noise_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)Last updated.*?\n",
            r"(?i)Version.*?\n",
            r"(?i)Copyright.*?\n",
            r"(?i)All rights reserved.*?\n",
            r"(?i)Page \d+ of \d+",
            r"(?i)Table of Contents",
            r"(?i)Navigation",
            r"(?i)Search.*?\n",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("noise regex is valid"))
        .collect()
    })
}

fn blank_lines_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("blank line regex is valid"))
}

/// Finds topics introduced by phrases like "how to" or "working with"
///
/// The content is split on `". "`. Each lower-cased piece that starts with a
/// topic phrase yields the rest of its line when that is longer than five
/// characters. Topics are title-cased, deduplicated and capped at ten.
///
/// ```
/// use docsift::parser::extract_topics;
///
/// let topics = extract_topics("How to deploy services. Using the CLI tool. Using it");
/// assert_eq!(topics, vec!["Deploy Services", "The Cli Tool"]);
/// ```
pub fn extract_topics(content: &str) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();

    for sentence in content.split(". ") {
        let lowered = sentence.to_lowercase();

        for pattern in topic_patterns() {
            let Some(capture) = pattern.captures(&lowered).and_then(|caps| caps.get(1)) else {
                continue;
            };

            if capture.as_str().chars().count() <= 5 {
                continue;
            }

            let topic = title_case(capture.as_str().trim());
            if !topics.contains(&topic) {
                topics.push(topic);
            }
        }
    }

    topics.truncate(MAX_TOPICS);
    topics
}

/// Strips boilerplate such as version banners and "Table of Contents"
///
/// Runs of three or more newlines collapse to two and the result is trimmed.
pub fn clean_documentation_content(content: &str) -> String {
    let mut cleaned = content.to_string();

    for pattern in noise_patterns() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }

    blank_lines_re()
        .replace_all(&cleaned, "\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics_from_each_pattern() {
        let content = "Guide to writing plugins. Introduction to the scheduler. \
                       Managing user accounts. Tips for faster builds";
        assert_eq!(
            extract_topics(content),
            vec![
                "Writing Plugins",
                "The Scheduler",
                "User Accounts",
                "Faster Builds"
            ]
        );
    }

    #[test]
    fn test_topic_must_start_sentence() {
        assert!(extract_topics("This explains how to deploy services").is_empty());
    }

    #[test]
    fn test_short_topics_dropped() {
        assert!(extract_topics("Using rust").is_empty());
    }

    #[test]
    fn test_topics_deduplicated_and_capped() {
        let mut content = String::from("Using the api. Using the api");
        for i in 0..15 {
            content.push_str(&format!(". Using feature number {}", i));
        }
        let topics = extract_topics(&content);
        assert_eq!(topics.len(), 10);
        assert_eq!(topics[0], "The Api");
        assert_eq!(topics[1], "Feature Number 0");
    }

    #[test]
    fn test_clean_documentation_content() {
        let content = "Table of Contents\nIntro text\nVersion 2.1\nBody\n\n\n\nPage 3 of 9 End";
        assert_eq!(clean_documentation_content(content), "Intro text\nBody\n\n End");
    }

    #[test]
    fn test_noise_patterns_ignore_case() {
        assert_eq!(clean_documentation_content("NAVIGATION menu"), "menu");
    }
}
