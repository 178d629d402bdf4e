//! Module analysis over parsed pages
//!
//! The analyzer turns parsed pages into [`Module`]s in four steps:
//! - Candidate extraction from titles, headings and breadcrumbs
//! - Clustering of related candidates (embeddings + DBSCAN, or TF-IDF + dedupe)
//! - Description and submodule generation (generative backend or heuristic)
//! - Confidence scoring
//!
//! Remote capabilities are optional and resolved once at construction. No
//! analyzer failure aborts a run; every step has a local fallback.

mod backend;
mod candidates;
mod cluster;
mod confidence;
mod dbscan;
mod describe;
mod tfidf;
mod types;

pub use backend::{ChatCompletionBackend, DescriptionBackend, DescriptionRequest, Embedder, HttpEmbedder};
pub use candidates::{build_corpus, extract_candidates};
pub use cluster::{choose_representative, cluster, dedupe_case_insensitive, CLUSTER_RADIUS, MIN_CLUSTER_SAMPLES};
pub use confidence::confidence_score;
pub use dbscan::{dbscan, Labels};
pub use describe::{
    describe, describe_heuristic, extract_potential_submodules, extract_submodules, relevant_sentences,
    MAX_DESCRIPTION_CHARS, MAX_SUBMODULE_DESCRIPTION_CHARS,
};
pub use tfidf::{cosine_similarity_matrix, fit_transform, tokenize};
pub use types::{CandidateSource, Module, ModuleCandidate, Submodules};

use crate::config::{AnalyzerConfig, Config};
use crate::parser::ParsedPage;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised inside the analyzer
///
/// These never leave [`ModuleAnalyzer::analyze`]; they are logged and the
/// matching fallback is used.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("No usable terms to vectorise")]
    EmptyVocabulary,

    #[error("Vector dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Description generation failed: {0}")]
    Generation(String),
}

/// Turns parsed pages into modules
#[derive(Clone)]
pub struct ModuleAnalyzer {
    config: AnalyzerConfig,
    embedder: Option<Arc<dyn Embedder>>,
    backend: Option<Arc<dyn DescriptionBackend>>,
}

impl std::fmt::Debug for ModuleAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleAnalyzer")
            .field("config", &self.config)
            .field("embedder", &self.embedder.is_some())
            .field("backend", &self.backend.is_some())
            .finish()
    }
}

impl ModuleAnalyzer {
    /// Creates an analyzer with no remote capabilities
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            embedder: None,
            backend: None,
        }
    }

    /// Creates an analyzer and resolves the capabilities enabled in `config`
    ///
    /// A capability that is enabled but has no API key in the environment is
    /// left out with a warning.
    pub fn from_config(config: &Config) -> Self {
        let mut analyzer = Self::new(config.analyzer.clone());

        if let Some(embedder) = HttpEmbedder::from_config(&config.embedding) {
            tracing::info!("Using embedding model {}", config.embedding.model);
            analyzer = analyzer.with_embedder(Arc::new(embedder));
        }
        if let Some(backend) = ChatCompletionBackend::from_config(&config.llm) {
            tracing::info!("Using LLM {} for descriptions", config.llm.model);
            analyzer = analyzer.with_backend(Arc::new(backend));
        }

        analyzer
    }

    pub fn with_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn with_backend(mut self, backend: Arc<dyn DescriptionBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn has_embedder(&self) -> bool {
        self.embedder.is_some()
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Finds the modules described by `pages`
    ///
    /// # Arguments
    ///
    /// * `pages` - Parsed pages in crawl order
    ///
    /// # Returns
    ///
    /// One module per cluster representative, in representative order.
    pub async fn analyze(&self, pages: &[ParsedPage]) -> Vec<Module> {
        let corpus = build_corpus(pages);
        let candidates = extract_candidates(pages);
        let representatives = cluster(candidates, self.embedder.as_deref()).await;

        let mut modules = Vec::with_capacity(representatives.len());
        for candidate in &representatives {
            let description = describe(candidate, &corpus, self.backend.as_deref()).await;
            let submodules = extract_submodules(candidate, &corpus, self.config.max_submodules);
            let confidence_score = confidence_score(candidate, &description);

            tracing::debug!(
                "Module '{}' from {} ({} submodules, confidence {:.2})",
                candidate.name,
                candidate.source,
                submodules.len(),
                confidence_score
            );

            modules.push(Module {
                name: candidate.name.clone(),
                description,
                submodules,
                confidence_score,
                source_urls: vec![candidate.url.clone()],
            });
        }

        tracing::info!("Identified {} modules from {} pages", modules.len(), pages.len());
        modules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_page;
    use async_trait::async_trait;

    fn getting_started() -> ParsedPage {
        let html = r#"
            <html>
            <head><title>Getting Started</title></head>
            <body>
                <h2>Installation</h2>
                <p>Installation includes downloading, configuring, and testing the package.</p>
            </body>
            </html>
        "#;
        parse_page(
            "https://docs.example.com/start",
            html,
            "Installation includes downloading, configuring, and testing the package.",
        )
        .unwrap()
    }

    struct ConstantEmbedder;

    #[async_trait]
    impl Embedder for ConstantEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, AnalyzerError> {
            Ok(texts.iter().map(|_| vec![1.0, 1.0]).collect())
        }
    }

    #[tokio::test]
    async fn test_getting_started_scenario() {
        let analyzer = ModuleAnalyzer::new(AnalyzerConfig::default());
        let modules = analyzer.analyze(&[getting_started()]).await;

        let names: Vec<&str> = modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Getting Started", "Installation"]);

        let installation = &modules[1];
        assert_eq!(
            installation.submodules.names().collect::<Vec<_>>(),
            vec!["Downloading", "Configuring", "Testing The Package"]
        );
        assert!(installation
            .description
            .starts_with("Installation: Installation includes downloading"));
        assert_eq!(installation.source_urls, vec!["https://docs.example.com/start"]);
    }

    #[tokio::test]
    async fn test_scores_in_range() {
        let analyzer = ModuleAnalyzer::new(AnalyzerConfig::default());
        for module in analyzer.analyze(&[getting_started()]).await {
            assert!((0.5..=1.0).contains(&module.confidence_score));
            assert!(module.description.chars().count() <= MAX_DESCRIPTION_CHARS);
        }
    }

    #[tokio::test]
    async fn test_embedding_path_merges_everything_similar() {
        let analyzer =
            ModuleAnalyzer::new(AnalyzerConfig::default()).with_embedder(Arc::new(ConstantEmbedder));
        let modules = analyzer.analyze(&[getting_started()]).await;

        // identical vectors form one cluster; the title wins
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].name, "Getting Started");
    }

    #[tokio::test]
    async fn test_submodule_cap_respected() {
        let config = AnalyzerConfig {
            max_submodules: 1,
            ..AnalyzerConfig::default()
        };
        let modules = ModuleAnalyzer::new(config).analyze(&[getting_started()]).await;
        assert!(modules.iter().all(|m| m.submodules.len() <= 1));
    }

    #[test]
    fn test_capabilities_without_keys_are_left_out() {
        let mut config = Config::default();
        config.embedding.enabled = true;
        config.embedding.api_key_env = "DOCSIFT_TEST_UNSET_EMBED_KEY".to_string();
        config.llm.enabled = true;
        config.llm.api_key_env = "DOCSIFT_TEST_UNSET_LLM_KEY".to_string();

        let analyzer = ModuleAnalyzer::from_config(&config);
        assert!(!analyzer.has_embedder());
        assert!(!analyzer.has_backend());
    }

    #[tokio::test]
    async fn test_no_pages_no_modules() {
        let analyzer = ModuleAnalyzer::new(AnalyzerConfig::default());
        assert!(analyzer.analyze(&[]).await.is_empty());
    }
}
