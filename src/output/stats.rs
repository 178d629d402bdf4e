//! Summary statistics over extracted modules
//!
//! This module computes and prints an overview of one extraction: module and
//! submodule counts, average confidence and the most confident modules.

use crate::analyzer::Module;
use serde::Serialize;

/// How many modules the summary lists by confidence
const TOP_MODULES: usize = 3;

/// A module name with its confidence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleConfidence {
    pub module: String,
    pub confidence: f64,
}

/// Extraction summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    /// Total number of modules
    pub total_modules: usize,

    /// Total number of submodules across all modules
    pub total_submodules: usize,

    /// Mean confidence rounded to three decimals, 0 without modules
    pub average_confidence: f64,

    /// Most confident modules, highest first
    pub top_modules: Vec<ModuleConfidence>,

    /// When the modules were extracted
    pub extraction_timestamp: String,
}

/// Computes summary statistics for `modules`
///
/// # Arguments
///
/// * `modules` - The extracted modules
/// * `timestamp` - Extraction timestamp to carry into the summary
pub fn summary_stats(modules: &[Module], timestamp: &str) -> SummaryStats {
    let total_submodules = modules.iter().map(|m| m.submodules.len()).sum();

    let average_confidence = if modules.is_empty() {
        0.0
    } else {
        let sum: f64 = modules.iter().map(|m| m.confidence_score).sum();
        ((sum / modules.len() as f64) * 1000.0).round() / 1000.0
    };

    // stable sort keeps extraction order among equal scores
    let mut ranked: Vec<&Module> = modules.iter().collect();
    ranked.sort_by(|a, b| b.confidence_score.total_cmp(&a.confidence_score));

    let top_modules = ranked
        .into_iter()
        .take(TOP_MODULES)
        .map(|m| ModuleConfidence {
            module: m.name.clone(),
            confidence: m.confidence_score,
        })
        .collect();

    SummaryStats {
        total_modules: modules.len(),
        total_submodules,
        average_confidence,
        top_modules,
        extraction_timestamp: timestamp.to_string(),
    }
}

/// Prints summary statistics to stderr in a formatted manner
///
/// Rendered output may go to stdout, so the summary stays out of its way.
pub fn print_summary(stats: &SummaryStats) {
    eprintln!("=== Extraction Summary ===\n");
    eprintln!("  Modules: {}", stats.total_modules);
    eprintln!("  Submodules: {}", stats.total_submodules);
    eprintln!("  Average confidence: {:.3}", stats.average_confidence);

    if !stats.top_modules.is_empty() {
        eprintln!("\nTop Modules:");
        for top in &stats.top_modules {
            eprintln!("  - {} ({:.0}%)", top.module, top.confidence * 100.0);
        }
    }

    eprintln!("\nExtracted at: {}", stats.extraction_timestamp);
}
