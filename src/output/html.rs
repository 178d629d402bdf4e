//! Standalone HTML report

use crate::analyzer::Module;
use crate::output::traits::{ModuleRenderer, OutputResult, RenderOptions};

const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 40px; }
h1 { color: #333; }
.module { background: #f5f5f5; padding: 20px; margin: 20px 0; border-radius: 8px; }
.module h2 { color: #2c3e50; margin-top: 0; }
.submodule { margin: 10px 0; padding: 10px; background: white; border-left: 4px solid #3498db; }
.confidence { float: right; background: #3498db; color: white; padding: 5px 10px; border-radius: 4px; }
.timestamp { color: #7f8c8d; font-style: italic; }
";

/// Escapes text for use in element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders modules as a self-contained HTML page
///
/// Every module shows its confidence as a whole percentage. All text from
/// the crawl is escaped.
pub fn generate_html_report(modules: &[Module], options: &RenderOptions) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<title>Documentation Modules Analysis</title>\n");
    html.push_str(&format!("<style>\n{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n");
    html.push_str("<h1>Documentation Modules Analysis</h1>\n");
    html.push_str(&format!(
        "<p class=\"timestamp\">Generated: {}</p>\n",
        escape_html(&options.timestamp)
    ));

    for module in modules {
        let percent = (module.confidence_score * 100.0).round() as u32;

        html.push_str("<div class=\"module\">\n");
        html.push_str(&format!("<span class=\"confidence\">{}% confident</span>\n", percent));
        html.push_str(&format!("<h2>{}</h2>\n", escape_html(&module.name)));
        html.push_str(&format!(
            "<p><strong>Description:</strong> {}</p>\n",
            escape_html(&module.description)
        ));

        if options.include_metadata && !module.source_urls.is_empty() {
            html.push_str("<ul class=\"sources\">\n");
            for url in &module.source_urls {
                let url = escape_html(url);
                html.push_str(&format!("<li><a href=\"{}\">{}</a></li>\n", url, url));
            }
            html.push_str("</ul>\n");
        }

        if module.submodules.is_empty() {
            html.push_str("<p><em>No submodules identified</em></p>\n");
        } else {
            html.push_str("<h3>Submodules:</h3>\n");
            for (name, description) in module.submodules.iter() {
                html.push_str(&format!(
                    "<div class=\"submodule\"><strong>{}</strong>: {}</div>\n",
                    escape_html(name),
                    escape_html(description)
                ));
            }
        }

        html.push_str("</div>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// HTML format
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl ModuleRenderer for HtmlRenderer {
    fn render(&self, modules: &[Module], options: &RenderOptions) -> OutputResult<String> {
        Ok(generate_html_report(modules, options))
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}
