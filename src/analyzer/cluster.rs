//! Grouping of related candidates
//!
//! Two paths:
//! - with an [`Embedder`], names are embedded and grouped with DBSCAN over
//!   cosine distance; every cluster collapses to one representative and
//!   unclustered names are dropped
//! - without one, names are vectorised with TF-IDF and then deduplicated
//!   case-insensitively, so every distinct name survives

use super::backend::Embedder;
use super::dbscan::dbscan;
use super::tfidf::{cosine_similarity_matrix, fit_transform};
use super::types::ModuleCandidate;
use super::AnalyzerError;
use std::collections::{BTreeMap, HashSet};

/// Cosine-distance radius for DBSCAN
pub const CLUSTER_RADIUS: f64 = 0.5;

/// Points (self included) needed for a DBSCAN core point
pub const MIN_CLUSTER_SAMPLES: usize = 2;

/// Groups candidates into one candidate per module
///
/// # Arguments
///
/// * `candidates` - Candidates in extraction order
/// * `embedder` - Embedding capability, if one is configured
///
/// # Returns
///
/// The representatives in order of first appearance. Any failure along
/// either path is logged and the candidates come back unchanged.
pub async fn cluster(
    candidates: Vec<ModuleCandidate>,
    embedder: Option<&dyn Embedder>,
) -> Vec<ModuleCandidate> {
    if candidates.is_empty() {
        return candidates;
    }

    let result = match embedder {
        Some(embedder) => cluster_by_embedding(&candidates, embedder).await,
        None => cluster_by_tfidf(&candidates),
    };

    match result {
        Ok(clustered) => {
            tracing::info!(
                "Clustered {} candidates into {} modules",
                candidates.len(),
                clustered.len()
            );
            clustered
        }
        Err(e) => {
            tracing::error!("Clustering failed: {}", e);
            candidates
        }
    }
}

async fn cluster_by_embedding(
    candidates: &[ModuleCandidate],
    embedder: &dyn Embedder,
) -> Result<Vec<ModuleCandidate>, AnalyzerError> {
    let names: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
    let embeddings = embedder.embed(&names).await?;
    if embeddings.len() != names.len() {
        return Err(AnalyzerError::Embedding(format!(
            "expected {} embeddings, got {}",
            names.len(),
            embeddings.len()
        )));
    }

    let similarity = cosine_similarity_matrix(&embeddings)?;
    let distances: Vec<Vec<f64>> = similarity
        .iter()
        .map(|row| row.iter().map(|s| (1.0 - s).max(0.0)).collect())
        .collect();

    let labels = dbscan(&distances, CLUSTER_RADIUS, MIN_CLUSTER_SAMPLES);

    // Labels are numbered in discovery order, which is the order of each
    // cluster's first member.
    let mut clusters: BTreeMap<usize, Vec<&ModuleCandidate>> = BTreeMap::new();
    for (candidate, label) in candidates.iter().zip(&labels) {
        if let Some(label) = label {
            clusters.entry(*label).or_default().push(candidate);
        }
    }

    let noise = labels.iter().filter(|l| l.is_none()).count();
    if noise > 0 {
        tracing::debug!("Dropped {} unclustered candidates", noise);
    }

    Ok(clusters
        .into_values()
        .filter_map(|members| choose_representative(&members).cloned())
        .collect())
}

fn cluster_by_tfidf(candidates: &[ModuleCandidate]) -> Result<Vec<ModuleCandidate>, AnalyzerError> {
    let names: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
    let rows = fit_transform(&names)?;
    let similarity = cosine_similarity_matrix(&rows)?;

    let related_pairs = similarity
        .iter()
        .enumerate()
        .flat_map(|(i, row)| row.iter().skip(i + 1).filter(|&&s| s > 0.0))
        .count();
    tracing::debug!(
        "TF-IDF similarity over {} names: {} related pairs",
        names.len(),
        related_pairs
    );

    Ok(dedupe_case_insensitive(candidates))
}

/// Keeps the first candidate of every case-insensitively equal name
pub fn dedupe_case_insensitive(candidates: &[ModuleCandidate]) -> Vec<ModuleCandidate> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .filter(|c| seen.insert(c.name.to_lowercase()))
        .cloned()
        .collect()
}

/// Picks the candidate that stands for a cluster
///
/// Lowest source priority wins, then the longest content, then the earliest
/// member.
pub fn choose_representative<'a>(members: &[&'a ModuleCandidate]) -> Option<&'a ModuleCandidate> {
    members
        .iter()
        .enumerate()
        .min_by_key(|(index, c)| {
            (
                c.source.priority(),
                std::cmp::Reverse(c.content.chars().count()),
                *index,
            )
        })
        .map(|(_, c)| *c)
}
