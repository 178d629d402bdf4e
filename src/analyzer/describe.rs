//! Module descriptions and submodules
//!
//! Descriptions come from a [`DescriptionBackend`] when one is configured and
//! from sentence extraction otherwise. A backend failure always falls back to
//! the extracted description.

use super::backend::{DescriptionBackend, DescriptionRequest};
use super::types::{ModuleCandidate, Submodules};
use crate::text::{split_sentences, title_case, truncate_chars};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Longest module description, prefix included
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Longest submodule description
pub const MAX_SUBMODULE_DESCRIPTION_CHARS: usize = 200;

/// Module content sent to a backend
const BACKEND_CONTENT_CHARS: usize = 2000;

/// Corpus excerpt sent to a backend
const BACKEND_CONTEXT_CHARS: usize = 3000;

const MAX_RELEVANT_SENTENCES: usize = 5;

fn submodule_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)includes\s+(.+?)(?:\.|$)",
            r"(?i)such as\s+(.+?)(?:\.|$)",
            r"(?i)including\s+(.+?)(?:\.|$)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("submodule regex is valid"))
        .collect()
    })
}

fn item_separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",|\band\b|\bor\b").expect("separator regex is valid"))
}

/// Sentences of `text` that mention `topic`
///
/// A sentence is relevant when it contains the lower-cased topic or shares
/// at least two whitespace-separated words with it. At most five are kept.
pub fn relevant_sentences(topic: &str, text: &str) -> Vec<String> {
    let topic_lower = topic.to_lowercase();
    let topic_words: HashSet<&str> = topic_lower.split_whitespace().collect();

    split_sentences(text)
        .into_iter()
        .filter(|sentence| {
            let lowered = sentence.to_lowercase();
            if lowered.contains(&topic_lower) {
                return true;
            }
            let words: HashSet<&str> = lowered.split_whitespace().collect();
            words.intersection(&topic_words).count() >= 2
        })
        .take(MAX_RELEVANT_SENTENCES)
        .collect()
}

fn relevant_with_fallback(topic: &str, content: &str, corpus: &str) -> Vec<String> {
    let sentences = relevant_sentences(topic, content);
    if sentences.is_empty() {
        relevant_sentences(topic, corpus)
    } else {
        sentences
    }
}

/// Builds a description from sentences that mention the module
///
/// # Returns
///
/// `"{name}: "` followed by up to three relevant sentences, cut to
/// [`MAX_DESCRIPTION_CHARS`] in total, or a generic sentence when nothing
/// mentions the module.
pub fn describe_heuristic(candidate: &ModuleCandidate, corpus: &str) -> String {
    let sentences = relevant_with_fallback(&candidate.name, &candidate.content, corpus);
    if sentences.is_empty() {
        return format!("Module related to {} functionality.", candidate.name);
    }

    let description = format!("{}: {}", candidate.name, join_first(&sentences, 3));
    truncate_chars(&description, MAX_DESCRIPTION_CHARS).to_string()
}

fn join_first(sentences: &[String], count: usize) -> String {
    sentences
        .iter()
        .take(count)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Describes a module, preferring the backend when one is given
///
/// # Arguments
///
/// * `candidate` - The module's representative candidate
/// * `corpus` - Text of the whole crawl
/// * `backend` - Generative backend, if configured
pub async fn describe(
    candidate: &ModuleCandidate,
    corpus: &str,
    backend: Option<&dyn DescriptionBackend>,
) -> String {
    if let Some(backend) = backend {
        let request = DescriptionRequest {
            module_name: &candidate.name,
            module_content: truncate_chars(&candidate.content, BACKEND_CONTENT_CHARS),
            context: truncate_chars(corpus, BACKEND_CONTEXT_CHARS),
        };

        match backend.describe(&request).await {
            Ok(description) if !description.trim().is_empty() => {
                return description.trim().to_string();
            }
            Ok(_) => tracing::warn!("Empty description for '{}'", candidate.name),
            Err(e) => tracing::error!("Description generation failed for '{}': {}", candidate.name, e),
        }
    }

    describe_heuristic(candidate, corpus)
}

/// Finds submodule names listed in `content`
///
/// Looks for lists after "includes", "such as" and "including", splits them
/// on commas, "and" and "or", and title-cases every item longer than three
/// characters. Duplicates (ignoring case) are removed, first one wins.
pub fn extract_potential_submodules(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for pattern in submodule_patterns() {
        for captures in pattern.captures_iter(content) {
            let Some(listed) = captures.get(1) else {
                continue;
            };
            for item in item_separator_re().split(listed.as_str()) {
                let item = item.trim();
                if item.chars().count() <= 3 {
                    continue;
                }
                let name = title_case(item);
                if seen.insert(name.to_lowercase()) {
                    found.push(name);
                }
            }
        }
    }

    found
}

/// Submodules of a module, each with a short description
///
/// # Arguments
///
/// * `candidate` - The module's representative candidate
/// * `corpus` - Text of the whole crawl
/// * `max_submodules` - Cap on the number returned
pub fn extract_submodules(candidate: &ModuleCandidate, corpus: &str, max_submodules: usize) -> Submodules {
    extract_potential_submodules(&candidate.content)
        .into_iter()
        .take(max_submodules)
        .map(|name| {
            let description = describe_submodule(&name, &candidate.content, corpus);
            (name, description)
        })
        .collect()
}

fn describe_submodule(name: &str, content: &str, corpus: &str) -> String {
    let sentences = relevant_with_fallback(name, content, corpus);
    let description = if sentences.is_empty() {
        format!("Functionality related to {}.", name)
    } else {
        join_first(&sentences, 2)
    };
    truncate_chars(&description, MAX_SUBMODULE_DESCRIPTION_CHARS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::types::CandidateSource;
    use crate::analyzer::AnalyzerError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn candidate(name: &str, content: &str) -> ModuleCandidate {
        ModuleCandidate {
            name: name.to_string(),
            source: CandidateSource::Heading(2),
            content: content.to_string(),
            url: "https://example.com/".to_string(),
        }
    }

    struct FixedBackend(Result<String, String>);

    #[async_trait]
    impl DescriptionBackend for FixedBackend {
        async fn describe(&self, _request: &DescriptionRequest<'_>) -> Result<String, AnalyzerError> {
            self.0.clone().map_err(AnalyzerError::Generation)
        }
    }

    /// Records the sizes of what it was sent
    struct RecordingBackend(Mutex<Vec<(usize, usize)>>);

    #[async_trait]
    impl DescriptionBackend for RecordingBackend {
        async fn describe(&self, request: &DescriptionRequest<'_>) -> Result<String, AnalyzerError> {
            self.0.lock().unwrap().push((
                request.module_content.chars().count(),
                request.context.chars().count(),
            ));
            Ok("ok".to_string())
        }
    }

    #[test]
    fn test_relevant_sentences_by_substring_and_overlap() {
        let text = "Setup is quick. Run the setup wizard. The quick guide helps. Unrelated line.";
        assert_eq!(
            relevant_sentences("Setup", text),
            vec!["Setup is quick.", "Run the setup wizard."]
        );

        // two shared words, no substring match
        let text = "Read the quick guide now. Only quick here.";
        assert_eq!(relevant_sentences("guide quick start", text), vec!["Read the quick guide now."]);
    }

    #[test]
    fn test_relevant_sentences_capped() {
        let text = "Cache one. Cache two. Cache three. Cache four. Cache five. Cache six.";
        assert_eq!(relevant_sentences("cache", text).len(), 5);
    }

    #[test]
    fn test_heuristic_uses_content_then_corpus() {
        let c = candidate("Installation", "Installation takes a minute. Nothing else.");
        assert_eq!(
            describe_heuristic(&c, "Installation is in the corpus too."),
            "Installation: Installation takes a minute."
        );

        let c = candidate("Installation", "No match here.");
        assert_eq!(
            describe_heuristic(&c, "Installation is in the corpus."),
            "Installation: Installation is in the corpus."
        );

        let c = candidate("Installation", "");
        assert_eq!(
            describe_heuristic(&c, ""),
            "Module related to Installation functionality."
        );
    }

    #[test]
    fn test_heuristic_truncated_to_limit() {
        let sentence = format!("Logging {}.", "x".repeat(300));
        let content = format!("{} {} {}", sentence, sentence, sentence);
        let description = describe_heuristic(&candidate("Logging", &content), "");
        assert_eq!(description.chars().count(), MAX_DESCRIPTION_CHARS);
        assert!(description.starts_with("Logging: Logging x"));
    }

    #[tokio::test]
    async fn test_backend_reply_used() {
        let c = candidate("Installation", "Installation is easy.");
        let backend = FixedBackend(Ok("  Installs the tool.  ".to_string()));
        assert_eq!(describe(&c, "", Some(&backend)).await, "Installs the tool.");
    }

    #[tokio::test]
    async fn test_backend_failure_falls_back() {
        let c = candidate("Installation", "Installation is easy.");
        let failing = FixedBackend(Err("401".to_string()));
        let empty = FixedBackend(Ok("   ".to_string()));

        let expected = "Installation: Installation is easy.";
        assert_eq!(describe(&c, "", Some(&failing)).await, expected);
        assert_eq!(describe(&c, "", Some(&empty)).await, expected);
        assert_eq!(describe(&c, "", None).await, expected);
    }

    #[tokio::test]
    async fn test_backend_inputs_truncated() {
        let c = candidate("Big", &"a".repeat(5000));
        let corpus = "b".repeat(5000);
        let backend = RecordingBackend(Mutex::new(Vec::new()));
        describe(&c, &corpus, Some(&backend)).await;
        assert_eq!(*backend.0.lock().unwrap(), vec![(2000, 3000)]);
    }

    #[test]
    fn test_potential_submodules_from_lists() {
        let content = "Installation includes downloading, configuring, and testing the package.";
        assert_eq!(
            extract_potential_submodules(content),
            vec!["Downloading", "Configuring", "Testing The Package"]
        );
    }

    #[test]
    fn test_potential_submodules_all_patterns_and_dedupe() {
        let content = "Formats such as JSON or YAML files. Tools including yaml files and linters";
        assert_eq!(
            extract_potential_submodules(content),
            vec!["Json", "Yaml Files", "Linters"]
        );
    }

    #[test]
    fn test_short_list_items_dropped() {
        let content = "Debugging tools such as CLI, gdb, debuggers, and profilers.";
        assert_eq!(
            extract_potential_submodules(content),
            vec!["Debuggers", "Profilers"]
        );
    }

    #[test]
    fn test_submodules_capped_with_descriptions() {
        let c = candidate(
            "Storage",
            "Storage includes buckets, volumes, snapshots. Snapshots are incremental.",
        );
        let submodules = extract_submodules(&c, "", 2);
        assert_eq!(submodules.names().collect::<Vec<_>>(), vec!["Buckets", "Volumes"]);
        assert_eq!(
            submodules.get("Buckets"),
            Some("Storage includes buckets, volumes, snapshots.")
        );

        let all = extract_submodules(&c, "", 10);
        assert_eq!(
            all.get("Snapshots"),
            Some("Storage includes buckets, volumes, snapshots. Snapshots are incremental.")
        );
    }

    #[test]
    fn test_submodule_description_fallback_and_limit() {
        assert_eq!(
            describe_submodule("Widgets", "nothing", "nothing"),
            "Functionality related to Widgets."
        );

        let long_name = "w".repeat(250);
        let description = describe_submodule(&long_name, "", "");
        assert_eq!(description.chars().count(), MAX_SUBMODULE_DESCRIPTION_CHARS);

        let sentence = format!("Widgets {}.", "y".repeat(150));
        let content = format!("{} {}", sentence, sentence);
        assert_eq!(
            describe_submodule("Widgets", &content, "").chars().count(),
            MAX_SUBMODULE_DESCRIPTION_CHARS
        );
    }
}
