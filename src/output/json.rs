//! JSON module documents
//!
//! Each module becomes `{"module", "Description", "Submodules"}`, plus a
//! `metadata` object when requested. [`parse_json`] reads the same shape
//! back.

use crate::analyzer::{Module, Submodules};
use crate::output::traits::{ModuleRenderer, OutputResult, RenderOptions};
use serde::{Deserialize, Serialize};

/// Confidence assumed for documents written without metadata
const DEFAULT_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Serialize, Deserialize)]
struct ModuleDocument {
    module: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Submodules")]
    submodules: Submodules,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<ModuleMetadata>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ModuleMetadata {
    confidence_score: f64,
    #[serde(default)]
    source_urls: Vec<String>,
    #[serde(default)]
    extraction_timestamp: String,
}

/// Renders modules as a pretty-printed JSON array
///
/// # Arguments
///
/// * `modules` - Modules to render
/// * `include_metadata` - Add confidence, source URLs and `timestamp`
/// * `timestamp` - Extraction timestamp written into the metadata
pub fn generate_json(modules: &[Module], include_metadata: bool, timestamp: &str) -> OutputResult<String> {
    let documents: Vec<ModuleDocument> = modules
        .iter()
        .map(|module| ModuleDocument {
            module: module.name.clone(),
            description: module.description.clone(),
            submodules: module.submodules.clone(),
            metadata: include_metadata.then(|| ModuleMetadata {
                confidence_score: module.confidence_score,
                source_urls: module.source_urls.clone(),
                extraction_timestamp: timestamp.to_string(),
            }),
        })
        .collect();

    Ok(serde_json::to_string_pretty(&documents)?)
}

/// Reads modules back from [`generate_json`] output
///
/// Documents without metadata get a confidence of 0.5 and no source URLs.
pub fn parse_json(json: &str) -> OutputResult<Vec<Module>> {
    let documents: Vec<ModuleDocument> = serde_json::from_str(json)?;

    Ok(documents
        .into_iter()
        .map(|doc| {
            let (confidence_score, source_urls) = match doc.metadata {
                Some(metadata) => (metadata.confidence_score, metadata.source_urls),
                None => (DEFAULT_CONFIDENCE, Vec::new()),
            };
            Module {
                name: doc.module,
                description: doc.description,
                submodules: doc.submodules,
                confidence_score,
                source_urls,
            }
        })
        .collect())
}

/// JSON format
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl ModuleRenderer for JsonRenderer {
    fn render(&self, modules: &[Module], options: &RenderOptions) -> OutputResult<String> {
        generate_json(modules, options.include_metadata, &options.timestamp)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
