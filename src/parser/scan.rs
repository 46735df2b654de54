//! Indentation block scanner: finds `test:`/`doc:` regions in raw source.
//!
//! Purely line-based: a line whose stripped content is exactly `test:` or
//! `doc:` opens a block; the block runs through every following line that is
//! blank or indented strictly deeper than the keyword line. The scanner
//! never fails; unterminated blocks end at end-of-file.

use crate::model::{BlockKind, ContentLine};

/// A block candidate before scope attachment and content parsing.
#[derive(Debug)]
pub struct RawBlock {
    pub kind: BlockKind,
    /// Line of the keyword, 1-indexed.
    pub start_line: usize,
    /// Last non-blank content line; equals `start_line` for empty blocks.
    pub end_line: usize,
    /// Keyword-line indentation (raw character count).
    pub indent: usize,
    /// Raw content lines, blank lines excluded, not yet dedented.
    pub lines: Vec<ContentLine>,
}

/// Scan source text for block candidates, top to bottom.
pub fn scan(source: &str) -> Vec<RawBlock> {
    let lines: Vec<&str> = source.lines().collect();
    let mut blocks = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let Some(kind) = block_keyword(lines[i]) else {
            i += 1;
            continue;
        };

        let indent = indent_of(lines[i]);
        let start_line = i + 1;
        let mut content = Vec::new();
        let mut end_line = start_line;

        // Extent: blank lines are skipped but do not terminate the block.
        let mut j = i + 1;
        while j < lines.len() {
            if lines[j].trim().is_empty() {
                j += 1;
                continue;
            }
            if indent_of(lines[j]) <= indent {
                break;
            }
            content.push(ContentLine {
                line: j + 1,
                text: lines[j].to_string(),
            });
            end_line = j + 1;
            j += 1;
        }

        blocks.push(RawBlock {
            kind,
            start_line,
            end_line,
            indent,
            lines: content,
        });

        // Resume at the first line outside the block's extent; a shallower
        // keyword line there is the next candidate.
        i = j;
    }

    blocks
}

/// Keyword match for a block opener. Trailing content (`test: foo`)
/// disqualifies the line; it could be dict-literal-like host syntax.
fn block_keyword(line: &str) -> Option<BlockKind> {
    match line.trim() {
        "test:" => Some(BlockKind::Test),
        "doc:" => Some(BlockKind::Doc),
        _ => None,
    }
}

/// Indentation depth as raw leading-whitespace character count.
/// Tabs count as one character each; mixing is preserved verbatim.
pub fn indent_of(line: &str) -> usize {
    line.chars().take_while(|&c| c == ' ' || c == '\t').count()
}

/// Remove the common leading indentation from content lines, keeping
/// relative indentation and original line numbers intact.
pub fn dedent(lines: &[ContentLine]) -> Vec<ContentLine> {
    let min = lines
        .iter()
        .map(|l| indent_of(&l.text))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| ContentLine {
            line: l.line,
            text: l.text.chars().skip(min).collect(),
        })
        .collect()
}
