//! Output module for rendering extracted modules
//!
//! This module handles:
//! - Rendering modules as JSON, markdown, CSV or an HTML report
//! - Reading JSON output back into modules
//! - Summary statistics over an extraction

mod csv;
mod html;
mod json;
mod markdown;
pub mod stats;
mod traits;

pub use self::csv::{generate_csv, CsvRenderer};
pub use html::{escape_html, generate_html_report, HtmlRenderer};
pub use json::{generate_json, parse_json, JsonRenderer};
pub use markdown::{generate_markdown, MarkdownRenderer};
pub use stats::{print_summary, summary_stats, ModuleConfidence, SummaryStats};
pub use traits::{ModuleRenderer, OutputError, OutputResult, RenderOptions};

use crate::analyzer::Module;
use std::path::Path;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
    Csv,
    Html,
}

impl OutputFormat {
    /// The renderer for this format
    pub fn renderer(&self) -> Box<dyn ModuleRenderer> {
        match self {
            OutputFormat::Json => Box::new(JsonRenderer),
            OutputFormat::Markdown => Box::new(MarkdownRenderer),
            OutputFormat::Csv => Box::new(CsvRenderer),
            OutputFormat::Html => Box::new(HtmlRenderer),
        }
    }
}

/// Renders `modules` in `format`
pub fn render(modules: &[Module], format: OutputFormat, options: &RenderOptions) -> OutputResult<String> {
    format.renderer().render(modules, options)
}

/// Renders `modules` and writes them to `output_path`
///
/// # Arguments
///
/// * `modules` - Modules to write
/// * `format` - Output format
/// * `options` - Metadata switch and timestamp
/// * `output_path` - Destination file, created or truncated
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the file
/// * `Err(OutputError)` - Rendering or writing failed
pub fn write_output(
    modules: &[Module],
    format: OutputFormat,
    options: &RenderOptions,
    output_path: &Path,
) -> OutputResult<()> {
    let rendered = render(modules, format, options)?;
    std::fs::write(output_path, rendered)?;
    Ok(())
}
