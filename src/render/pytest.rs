//! Pytest renderer: one generated test function per assertion.
//!
//! Each generated test replays its block's earlier statements in source
//! order: setups verbatim, earlier assertions as bare expressions. State
//! visible to an assertion therefore matches sequential execution of the
//! whole block, while every assertion still fails or errors independently.
//! A setup that raises shows up as an error in every later test of the
//! block. Unparseable statements are never emitted.

use crate::model::{Block, Element, ElementKind, SourceDocument, TestBlock, TestStatement};
use crate::render::Renderer;

pub struct PytestRenderer;

impl Renderer for PytestRenderer {
    fn render(&self, document: &SourceDocument) -> anyhow::Result<String> {
        if document.assertion_count() == 0 {
            return Ok(String::new());
        }

        let mut tests: Vec<(usize, String)> = Vec::new();
        for block in &document.blocks {
            if let Block::Test(t) = block {
                emit_block(t, "module", None, &mut tests);
            }
        }
        for element in &document.elements {
            walk(element, None, &mut tests);
        }
        tests.sort_by_key(|(line, _)| *line);

        let stem = module_stem(&document.path);
        let mut out = String::new();
        out.push_str(&format!(
            "# Generated by tdoc from {}; do not edit.\n",
            document.path
        ));
        if is_identifier(&stem) {
            out.push_str(&format!("from {stem} import *\n"));
        } else {
            out.push_str("# Source file stem is not an importable module name; fix the import:\n");
            out.push_str(&format!("# from {stem} import *\n"));
        }
        for (_, text) in &tests {
            out.push_str("\n\n");
            out.push_str(text);
        }
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "py"
    }

    fn file_name(&self, stem: &str) -> String {
        format!("test_{stem}.py")
    }
}

/// Deterministic test identifier for (owning scope, block line, assertion
/// index). Also the lookup key tooling uses to map results back to lines.
pub fn test_name(scope: &str, block_line: usize, index: usize) -> String {
    let scope: String = scope
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("test_{scope}_{block_line}_{index}")
}

fn walk(element: &Element, context: Option<(&Element, &str)>, tests: &mut Vec<(usize, String)>) {
    let qualified = match context {
        Some((_, parent_qualified)) => format!("{parent_qualified}.{}", element.name),
        None => element.name.clone(),
    };
    // Only a method gets an implicit instance; class-level and function
    // blocks run as written.
    let class_path = match context {
        Some((parent, parent_qualified))
            if parent.kind == ElementKind::Class && element.kind == ElementKind::Function =>
        {
            Some(parent_qualified.to_string())
        }
        _ => None,
    };

    for block in &element.blocks {
        if let Block::Test(t) = block {
            emit_block(t, &qualified, class_path.as_deref(), tests);
        }
    }
    for child in &element.children {
        walk(child, Some((element, &qualified)), tests);
    }
}

fn emit_block(
    block: &TestBlock,
    scope: &str,
    class_path: Option<&str>,
    tests: &mut Vec<(usize, String)>,
) {
    let implicit = class_path.filter(|class| !binds_instance(block, class));

    let mut index = 0;
    for (position, statement) in block.statements.iter().enumerate() {
        let TestStatement::Assertion(assertion) = statement else {
            continue;
        };
        index += 1;

        let mut body = String::new();
        if let Some(class) = implicit {
            body.push_str(&format!("    self = {class}()\n"));
        }
        for earlier in &block.statements[..position] {
            match earlier {
                TestStatement::Setup(s) => body.push_str(&indent_lines(&s.code)),
                TestStatement::Assertion(a) => body.push_str(&indent_lines(&a.expression)),
                TestStatement::Unparseable(_) => {}
            }
        }
        body.push_str(&format!(
            "    assert {}, {q}{}{q}\n",
            assertion.expression,
            assertion.description,
            q = assertion.quote,
        ));

        let name = test_name(scope, block.start_line, index);
        tests.push((block.start_line, format!("def {name}():\n{body}")));
    }
}

/// Does any setup already bind an instance of the enclosing class?
/// Looks for an assignment whose right side calls the class, by qualified
/// or simple name.
fn binds_instance(block: &TestBlock, class_path: &str) -> bool {
    let simple = class_path.rsplit('.').next().unwrap_or(class_path);
    block.statements.iter().any(|statement| {
        let TestStatement::Setup(setup) = statement else {
            return false;
        };
        setup.code.lines().any(|line| {
            let Some((lhs, rhs)) = line.split_once('=') else {
                return false;
            };
            let rhs = rhs.trim_start();
            is_identifier(lhs.trim())
                && !rhs.starts_with('=')
                && [class_path, simple].iter().any(|name| {
                    rhs.strip_prefix(name)
                        .is_some_and(|rest| rest.trim_start().starts_with('('))
                })
        })
    })
}

fn indent_lines(code: &str) -> String {
    let mut out = String::new();
    for line in code.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn module_stem(path: &str) -> String {
    std::path::Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("module")
        .to_string()
}
