//! Confidence scoring

use super::types::{CandidateSource, ModuleCandidate};

const BASE_SCORE: f64 = 0.5;
const LONG_CONTENT_CHARS: usize = 800;
const LONG_DESCRIPTION_CHARS: usize = 100;

/// Scores how likely a module is real
///
/// Starts at 0.5; adds 0.2 for content over 800 characters, 0.1 for a
/// description over 100 characters and 0.1 when the name is a page title.
pub fn confidence_score(candidate: &ModuleCandidate, description: &str) -> f64 {
    let mut score = BASE_SCORE;

    if candidate.content.chars().count() > LONG_CONTENT_CHARS {
        score += 0.2;
    }
    if description.chars().count() > LONG_DESCRIPTION_CHARS {
        score += 0.1;
    }
    if candidate.source == CandidateSource::Title {
        score += 0.1;
    }

    score.clamp(0.0, 1.0)
}
