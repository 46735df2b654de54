//! Markdown renderer for doc blocks.
//!
//! One heading level per scope depth: module, then class, then method.
//! Scopes without doc blocks produce no heading at all; documented scopes
//! under an undocumented parent still render, with their qualified name
//! carrying the context. Output is a pure function of the model, so the
//! same input always produces byte-identical markdown.

use crate::model::{Block, ContentLine, DocBlock, DocEntry, DocSection, Element, SectionKind, SourceDocument};
use crate::parser::scan::dedent;
use crate::render::Renderer;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, document: &SourceDocument) -> anyhow::Result<String> {
        let mut out = String::new();

        let module_docs: Vec<&DocBlock> = doc_blocks(&document.blocks);
        if !module_docs.is_empty() {
            push_chunk(&mut out, &format!("# {}", module_title(&document.path)));
            for block in module_docs {
                render_doc_block(&mut out, block, 1);
            }
        }

        for element in &document.elements {
            render_element(&mut out, element, None, 2);
        }

        let text = out.trim_end();
        if text.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!("{text}\n"))
        }
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn render_element(out: &mut String, element: &Element, parent: Option<&str>, level: usize) {
    let qualified = match parent {
        Some(p) => format!("{p}.{}", element.name),
        None => element.name.clone(),
    };

    let docs = doc_blocks(&element.blocks);
    if !docs.is_empty() {
        push_chunk(out, &format!("{} {}", heading(level), qualified));
        for block in docs {
            render_doc_block(out, block, level);
        }
    }

    for child in &element.children {
        render_element(out, child, Some(&qualified), level + 1);
    }
}

fn render_doc_block(out: &mut String, block: &DocBlock, level: usize) {
    for paragraph in &block.description {
        push_chunk(out, paragraph);
    }
    for section in &block.sections {
        render_section(out, section, level + 1);
    }
}

fn render_section(out: &mut String, section: &DocSection, level: usize) {
    push_chunk(out, &format!("{} {}", heading(level), section.kind.title()));

    match section.kind {
        SectionKind::Args | SectionKind::Raises => {
            if !section.entries.is_empty() {
                let items: Vec<String> = section.entries.iter().map(render_entry).collect();
                push_chunk(out, &items.join("\n"));
            }
            push_paragraphs(out, &section.text);
        }
        SectionKind::Examples => {
            let mut code = String::from("```python\n");
            let mut prev: Option<usize> = None;
            for cl in &dedent(&section.text) {
                if prev.is_some_and(|p| cl.line > p + 1) {
                    code.push('\n');
                }
                code.push_str(&cl.text);
                code.push('\n');
                prev = Some(cl.line);
            }
            code.push_str("```");
            push_chunk(out, &code);
        }
        SectionKind::SeeAlso | SectionKind::References => {
            let items: Vec<String> = section
                .text
                .iter()
                .map(|cl| format!("* {}", cl.text.trim()))
                .collect();
            if !items.is_empty() {
                push_chunk(out, &items.join("\n"));
            }
        }
        _ => push_paragraphs(out, &section.text),
    }
}

fn render_entry(entry: &DocEntry) -> String {
    match (&entry.type_name, entry.description.is_empty()) {
        (Some(t), false) => format!("* **{}** ({}): {}", entry.name, t, entry.description),
        (Some(t), true) => format!("* **{}** ({})", entry.name, t),
        (None, false) => format!("* **{}**: {}", entry.name, entry.description),
        (None, true) => format!("* **{}**", entry.name),
    }
}

/// Emit text lines as paragraphs, splitting on gaps in the source line
/// numbers. Lines are trimmed so indented section content does not turn
/// into accidental markdown code blocks.
fn push_paragraphs(out: &mut String, text: &[ContentLine]) {
    let mut paragraph: Vec<&str> = Vec::new();
    let mut prev: Option<usize> = None;
    for cl in text {
        if !paragraph.is_empty() && prev.is_some_and(|p| cl.line > p + 1) {
            push_chunk(out, &paragraph.join("\n"));
            paragraph.clear();
        }
        paragraph.push(cl.text.trim());
        prev = Some(cl.line);
    }
    if !paragraph.is_empty() {
        push_chunk(out, &paragraph.join("\n"));
    }
}

fn push_chunk(out: &mut String, text: &str) {
    out.push_str(text);
    out.push_str("\n\n");
}

fn heading(level: usize) -> String {
    "#".repeat(level.min(6))
}

fn doc_blocks(blocks: &[Block]) -> Vec<&DocBlock> {
    blocks
        .iter()
        .filter_map(|b| match b {
            Block::Doc(d) => Some(d),
            Block::Test(_) => None,
        })
        .collect()
}

fn module_title(path: &str) -> String {
    // Synthetic paths like <stdin> keep their angle brackets out of headings.
    std::path::Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .trim_matches(|c| c == '<' || c == '>')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn render(src: &str) -> String {
        MarkdownRenderer
            .render(&parse("calc.py", src))
            .expect("markdown rendering should not fail")
    }

    #[test]
    fn documented_function_gets_heading_and_sections() {
        let src = r#"def add(x, y):
    return x + y
doc:
    Adds two numbers.

    Args:
        x (int): the input
        y (int): the other input
    Returns:
        their sum
"#;
        let out = render(src);
        assert!(out.contains("## add\n"), "Got: {out}");
        assert!(out.contains("Adds two numbers.\n"), "Got: {out}");
        assert!(out.contains("### Arguments\n"), "Got: {out}");
        assert!(out.contains("* **x** (int): the input\n"), "Got: {out}");
        assert!(out.contains("### Returns\n\ntheir sum\n"), "Got: {out}");
    }

    #[test]
    fn method_heading_is_qualified() {
        let src = r#"class Calculator:
    def add(self, x, y):
        return x + y
    doc:
        Adds a value.
"#;
        let out = render(src);
        assert!(out.contains("### Calculator.add\n"), "Got: {out}");
    }

    #[test]
    fn undocumented_scope_emits_no_heading() {
        let src = r#"class Calculator:
    def add(self, x, y):
        return x + y
    doc:
        Adds a value.
"#;
        let out = render(src);
        assert!(!out.contains("## Calculator\n"), "Got: {out}");
        assert!(out.contains("### Calculator.add\n"), "Got: {out}");
    }

    #[test]
    fn module_docs_render_under_file_title() {
        let src = "doc:\n    Utilities for arithmetic.\n\ndef f():\n    pass\n";
        let out = render(src);
        assert!(out.starts_with("# calc\n\nUtilities for arithmetic.\n"), "Got: {out}");
    }

    #[test]
    fn no_module_heading_without_module_docs() {
        let src = "def f():\n    pass\ndoc:\n    A function.\n";
        let out = render(src);
        assert!(out.starts_with("## f\n"), "Got: {out}");
    }

    #[test]
    fn examples_render_as_fenced_python() {
        let src = r#"def add(x, y):
    return x + y
doc:
    Examples:
        >>> add(1, 2)
        3
"#;
        let out = render(src);
        assert!(out.contains("### Examples\n\n```python\n>>> add(1, 2)\n3\n```\n"), "Got: {out}");
    }

    #[test]
    fn example_paragraph_gaps_become_blank_lines() {
        let src = "def f():\n    pass\ndoc:\n    Examples:\n        >>> f()\n\n        >>> f()\n";
        let out = render(src);
        assert!(out.contains("```python\n>>> f()\n\n>>> f()\n```"), "Got: {out}");
    }

    #[test]
    fn see_also_lines_render_as_bullets() {
        let src = "def f():\n    pass\ndoc:\n    See also:\n        g\n        h\n";
        let out = render(src);
        assert!(out.contains("### See also\n\n* g\n* h\n"), "Got: {out}");
    }

    #[test]
    fn raises_entries_render_as_bullets() {
        let src = r#"def div(x, y):
    return x / y
doc:
    Raises:
        ZeroDivisionError: when y is zero
"#;
        let out = render(src);
        assert!(out.contains("### Raises\n\n* **ZeroDivisionError**: when y is zero\n"), "Got: {out}");
    }

    #[test]
    fn description_paragraphs_separated() {
        let src = "def f():\n    pass\ndoc:\n    First paragraph.\n\n    Second paragraph.\n";
        let out = render(src);
        assert!(out.contains("First paragraph.\n\nSecond paragraph.\n"), "Got: {out}");
    }

    #[test]
    fn test_blocks_do_not_appear() {
        let src = "def f():\n    pass\ntest:\n    f() == 1: \"t\"\n";
        let out = render(src);
        assert!(out.is_empty(), "Got: {out}");
    }

    #[test]
    fn output_ends_with_single_newline() {
        let src = "def f():\n    pass\ndoc:\n    A function.\n";
        let out = render(src);
        assert!(out.ends_with(".\n"), "Got: {out}");
        assert!(!out.ends_with("\n\n"), "Got: {out}");
    }
}
