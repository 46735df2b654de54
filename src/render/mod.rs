//! Output format dispatch behind the `Renderer` trait.

pub mod json;
pub mod markdown;
pub mod pytest;

use crate::model::SourceDocument;
use anyhow::{anyhow, Result};

/// Trait for rendering a SourceDocument into a specific output format.
/// Renderers return an empty string when a document has nothing to emit
/// in their format; callers skip writing empty output.
pub trait Renderer {
    fn render(&self, document: &SourceDocument) -> Result<String>;
    fn file_extension(&self) -> &str;

    /// Output file name for a source file stem.
    fn file_name(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.file_extension())
    }
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "tests" | "pytest" => Ok(Box::new(pytest::PytestRenderer)),
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use tests, markdown, or json",
            format
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_formats_resolve() {
        for format in ["tests", "pytest", "markdown", "md", "json"] {
            assert!(create_renderer(format).is_ok(), "format {format} should resolve");
        }
    }

    #[test]
    fn unknown_format_is_an_error() {
        let err = create_renderer("latex").err().unwrap();
        assert!(err.to_string().contains("unknown format"), "Got: {err}");
    }

    #[test]
    fn file_names_follow_format_conventions() {
        assert_eq!(create_renderer("tests").unwrap().file_name("calc"), "test_calc.py");
        assert_eq!(create_renderer("markdown").unwrap().file_name("calc"), "calc.md");
        assert_eq!(create_renderer("json").unwrap().file_name("calc"), "calc.json");
    }
}
