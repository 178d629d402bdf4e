//! Output renderer trait and shared types
//!
//! This module defines the interface every output format implements and the
//! error type they share.

use crate::analyzer::Module;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Settings shared by all renderers for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Attach confidence, sources and timestamp where the format allows
    pub include_metadata: bool,

    /// Extraction timestamp printed in headers and metadata
    pub timestamp: String,
}

impl RenderOptions {
    pub fn new(include_metadata: bool, timestamp: impl Into<String>) -> Self {
        Self {
            include_metadata,
            timestamp: timestamp.into(),
        }
    }
}

/// Turns a module list into a document in one format
pub trait ModuleRenderer {
    /// Renders `modules` in order
    ///
    /// # Arguments
    ///
    /// * `modules` - Modules to render
    /// * `options` - Metadata switch and timestamp
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The rendered document
    /// * `Err(OutputError)` - Serialization failed
    fn render(&self, modules: &[Module], options: &RenderOptions) -> OutputResult<String>;

    /// File extension for this format, without the dot
    fn extension(&self) -> &'static str;
}
