//! Markdown report generation
//!
//! This module renders modules as a human-readable markdown document, one
//! numbered section per module with its submodules as a bullet list.

use crate::analyzer::Module;
use crate::output::traits::{ModuleRenderer, OutputResult, RenderOptions};

/// Formats modules as markdown
///
/// # Arguments
///
/// * `modules` - Modules in output order
/// * `options` - Timestamp for the header; metadata adds confidence and sources
///
/// # Returns
///
/// A formatted markdown string
pub fn generate_markdown(modules: &[Module], options: &RenderOptions) -> String {
    let mut md = String::new();

    md.push_str("# Documentation Modules Analysis\n");
    md.push_str(&format!("*Generated: {}*\n\n", options.timestamp));

    for (i, module) in modules.iter().enumerate() {
        md.push_str(&format!("## {}. {}\n", i + 1, module.name));
        md.push_str(&format!("**Description**: {}\n\n", module.description));

        if options.include_metadata {
            md.push_str(&format!(
                "- **Confidence**: {:.2}\n",
                module.confidence_score
            ));
            for url in &module.source_urls {
                md.push_str(&format!("- **Source**: {}\n", url));
            }
            md.push('\n');
        }

        if module.submodules.is_empty() {
            md.push_str("*No submodules identified*\n");
        } else {
            md.push_str("### Submodules:\n");
            for (name, description) in module.submodules.iter() {
                md.push_str(&format!("- **{}**: {}\n", name, description));
            }
        }

        md.push('\n');
    }

    md
}

/// Markdown format
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl ModuleRenderer for MarkdownRenderer {
    fn render(&self, modules: &[Module], options: &RenderOptions) -> OutputResult<String> {
        Ok(generate_markdown(modules, options))
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}
