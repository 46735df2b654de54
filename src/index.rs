//! Lookup index over a parsed document.
//!
//! Flattens the model into the two tables external tooling needs: where
//! every definition lives, and which assertion sits on which line. Line
//! numbers and generated test names are the stable keys; both survive
//! re-parses of unchanged text. Serializes directly as the JSON output
//! format.

use serde::Serialize;

use crate::model::{Block, Element, ElementKind, SourceDocument, TestBlock, TestStatement};
use crate::render::pytest::test_name;

#[derive(Debug, Serialize)]
pub struct DocumentIndex {
    pub file: String,
    pub definitions: Vec<DefinitionRef>,
    pub assertions: Vec<AssertionRef>,
    /// Statements that could not be parsed and were skipped.
    pub skipped: usize,
}

/// One function or class definition, keyed by qualified name.
#[derive(Debug, Serialize)]
pub struct DefinitionRef {
    pub name: String,
    pub kind: String,
    pub line: usize,
}

/// One assertion, keyed by source line and generated test name.
#[derive(Debug, Serialize)]
pub struct AssertionRef {
    pub test_name: String,
    /// Qualified owning scope, `module` for module-level blocks.
    pub scope: String,
    pub line: usize,
    pub block_line: usize,
    /// 1-based position among the block's assertions.
    pub index: usize,
    pub expression: String,
    pub operator: String,
    pub description: String,
}

impl DocumentIndex {
    pub fn build(document: &SourceDocument) -> Self {
        let mut definitions = Vec::new();
        let mut assertions = Vec::new();

        for block in &document.blocks {
            if let Block::Test(t) = block {
                index_block(t, "module", &mut assertions);
            }
        }
        for element in &document.elements {
            index_element(element, None, &mut definitions, &mut assertions);
        }

        DocumentIndex {
            file: document.path.clone(),
            definitions,
            assertions,
            skipped: document.unparseable_count(),
        }
    }

    /// The assertion whose own source line is `line`, if any.
    pub fn assertion_at(&self, line: usize) -> Option<&AssertionRef> {
        self.assertions.iter().find(|a| a.line == line)
    }

    /// Definition lookup by qualified name, falling back to the first
    /// definition whose final segment matches a bare name.
    pub fn definition(&self, name: &str) -> Option<&DefinitionRef> {
        self.definitions
            .iter()
            .find(|d| d.name == name)
            .or_else(|| {
                self.definitions
                    .iter()
                    .find(|d| d.name.rsplit('.').next() == Some(name))
            })
    }
}

fn index_element(
    element: &Element,
    parent: Option<&str>,
    definitions: &mut Vec<DefinitionRef>,
    assertions: &mut Vec<AssertionRef>,
) {
    let qualified = match parent {
        Some(p) => format!("{p}.{}", element.name),
        None => element.name.clone(),
    };

    definitions.push(DefinitionRef {
        name: qualified.clone(),
        kind: match element.kind {
            ElementKind::Function => "function".to_string(),
            ElementKind::Class => "class".to_string(),
        },
        line: element.start_line,
    });

    for block in &element.blocks {
        if let Block::Test(t) = block {
            index_block(t, &qualified, assertions);
        }
    }
    for child in &element.children {
        index_element(child, Some(&qualified), definitions, assertions);
    }
}

fn index_block(block: &TestBlock, scope: &str, assertions: &mut Vec<AssertionRef>) {
    let mut index = 0;
    for statement in &block.statements {
        let TestStatement::Assertion(a) = statement else {
            continue;
        };
        index += 1;
        assertions.push(AssertionRef {
            test_name: test_name(scope, block.start_line, index),
            scope: scope.to_string(),
            line: a.line,
            block_line: block.start_line,
            index,
            expression: a.expression.clone(),
            operator: a.operator.as_str().to_string(),
            description: a.description.clone(),
        });
    }
}
