//! JSON renderer: serializes the document index for tooling.
//!
//! Serializes the document's lookup index: definitions, assertions with
//! their generated test names, and the skipped-statement count.

use crate::index::DocumentIndex;
use crate::model::SourceDocument;
use crate::render::Renderer;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, document: &SourceDocument) -> anyhow::Result<String> {
        let mut text = serde_json::to_string_pretty(&DocumentIndex::build(document))?;
        text.push('\n');
        Ok(text)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
