//! Doc block content parser.
//!
//! Content begins with free-text description paragraphs and continues with
//! named sections (Google docstring vocabulary). A section header is a line
//! holding exactly one recognized word and a colon; anything else, including
//! `Args: inline text`, stays plain text. Inside `Args`/`Raises`, lines of
//! the form `name (type): description` or `name: description` become
//! entries, with deeper-indented lines folded into the previous entry.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{ContentLine, DocEntry, DocSection, SectionKind};
use crate::parser::scan::indent_of;

static RE_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(arguments|args|parameters|param|returns|return|yields|yield|raises|raise|examples|example|notes|note|see\s+also|references):\s*$",
    )
    .unwrap()
});

static RE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\*{0,2}[A-Za-z_][\w.]*)\s*(?:\(([^)]+)\))?\s*:\s*(.*)$").unwrap()
});

/// Parse dedented doc content into description paragraphs and sections.
/// Paragraph boundaries are recovered from gaps in the original line
/// numbers, since blank lines are not part of block content.
pub fn parse(lines: &[ContentLine]) -> (Vec<String>, Vec<DocSection>) {
    let mut description = Vec::new();
    let mut sections: Vec<DocSection> = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut last_line = 0;
    let mut entry_indent = None;

    for cl in lines {
        if let Some(kind) = match_section(&cl.text) {
            flush_paragraph(&mut description, &mut paragraph);
            sections.push(DocSection {
                kind,
                entries: Vec::new(),
                text: Vec::new(),
            });
            entry_indent = None;
            continue;
        }

        match sections.last_mut() {
            None => {
                if !paragraph.is_empty() && cl.line > last_line + 1 {
                    flush_paragraph(&mut description, &mut paragraph);
                }
                paragraph.push(cl.text.trim_end());
                last_line = cl.line;
            }
            Some(section) => fill_section(section, cl, &mut entry_indent),
        }
    }

    flush_paragraph(&mut description, &mut paragraph);
    (description, sections)
}

fn match_section(line: &str) -> Option<SectionKind> {
    let caps = RE_SECTION.captures(line.trim())?;
    let word = caps[1].to_ascii_lowercase();
    let kind = match word.split_whitespace().collect::<Vec<_>>().join(" ").as_str() {
        "args" | "arguments" | "parameters" | "param" => SectionKind::Args,
        "returns" | "return" => SectionKind::Returns,
        "yields" | "yield" => SectionKind::Yields,
        "raises" | "raise" => SectionKind::Raises,
        "examples" | "example" => SectionKind::Examples,
        "notes" | "note" => SectionKind::Notes,
        "see also" => SectionKind::SeeAlso,
        "references" => SectionKind::References,
        _ => return None,
    };
    Some(kind)
}

fn fill_section(section: &mut DocSection, cl: &ContentLine, entry_indent: &mut Option<usize>) {
    if matches!(section.kind, SectionKind::Args | SectionKind::Raises) {
        let indent = indent_of(&cl.text);
        if let (Some(at), Some(entry)) = (*entry_indent, section.entries.last_mut()) {
            if indent > at {
                if !entry.description.is_empty() {
                    entry.description.push(' ');
                }
                entry.description.push_str(cl.text.trim());
                return;
            }
        }
        if let Some(caps) = RE_ENTRY.captures(cl.text.trim()) {
            *entry_indent = Some(indent);
            section.entries.push(DocEntry {
                name: caps[1].to_string(),
                type_name: caps.get(2).map(|m| m.as_str().trim().to_string()),
                description: caps[3].trim().to_string(),
                line: cl.line,
            });
            return;
        }
    }
    section.text.push(cl.clone());
}

fn flush_paragraph(description: &mut Vec<String>, paragraph: &mut Vec<&str>) {
    if !paragraph.is_empty() {
        description.push(paragraph.join("\n"));
        paragraph.clear();
    }
}
