//! CSV export for spreadsheets
//!
//! One row per submodule, or a single row with empty submodule columns for a
//! module without any. Fields are quoted per RFC 4180.

use crate::analyzer::Module;
use crate::output::traits::{ModuleRenderer, OutputResult, RenderOptions};

const HEADER: [&str; 5] = [
    "module",
    "description",
    "submodule",
    "submodule_description",
    "confidence_score",
];

/// Quotes a field when it holds a comma, quote or line break
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_row(out: &mut String, fields: &[&str]) {
    let row: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    out.push_str(&row.join(","));
    out.push_str("\r\n");
}

/// Formats modules as CSV with a header row
pub fn generate_csv(modules: &[Module]) -> String {
    let mut out = String::new();
    push_row(&mut out, &HEADER);

    for module in modules {
        let confidence = module.confidence_score.to_string();

        if module.submodules.is_empty() {
            push_row(&mut out, &[&module.name, &module.description, "", "", &confidence]);
            continue;
        }

        for (name, description) in module.submodules.iter() {
            push_row(
                &mut out,
                &[&module.name, &module.description, name, description, &confidence],
            );
        }
    }

    out
}

/// CSV format
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl ModuleRenderer for CsvRenderer {
    fn render(&self, modules: &[Module], _options: &RenderOptions) -> OutputResult<String> {
        Ok(generate_csv(modules))
    }

    fn extension(&self) -> &'static str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Submodules;

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a, b"), "\"a, b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_rows_per_submodule() {
        let mut submodules = Submodules::new();
        submodules.insert("Downloading", "Get it, fast.");
        submodules.insert("Testing", "Run checks.");

        let modules = vec![
            Module {
                name: "Installation".to_string(),
                description: "Install".to_string(),
                submodules,
                confidence_score: 0.7,
                source_urls: Vec::new(),
            },
            Module {
                name: "Usage".to_string(),
                description: "Use".to_string(),
                submodules: Submodules::new(),
                confidence_score: 0.5,
                source_urls: Vec::new(),
            },
        ];

        let csv = generate_csv(&modules);
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(
            lines,
            vec![
                "module,description,submodule,submodule_description,confidence_score",
                "Installation,Install,Downloading,\"Get it, fast.\",0.7",
                "Installation,Install,Testing,Run checks.,0.7",
                "Usage,Use,,,0.5",
                "",
            ]
        );
    }
}
