//! Scope resolver: maps scanned blocks to their owning definitions.
//!
//! Walks source lines once, tracking `def`/`class` headers with a scope
//! stack. A block at depth `d` attaches to:
//!
//! 1. the innermost open scope whose own header depth equals `d` (a
//!    *trailing* block written right below its definition at the same
//!    indent; for a class this is a class-level block);
//! 2. otherwise the innermost still-open scope whose body indentation
//!    equals `d`;
//! 3. otherwise the module. Blocks are never dropped.
//!
//! Only definition headers and blocks close scopes; plain statements never
//! do, so ordinary code between a function and its trailing `test:` block
//! does not break the attachment. A trailing block seals its scope's body:
//! later, deeper blocks fall through to the module.

use crate::model::ElementKind;
use crate::parser::scan::{indent_of, RawBlock};
use regex::Regex;
use std::sync::LazyLock;

static RE_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:async[ \t]+)?def[ \t]+([A-Za-z_]\w*)[ \t]*\(").unwrap()
});

static RE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*class[ \t]+([A-Za-z_]\w*)[ \t]*[:(]").unwrap()
});

/// A resolved definition header.
#[derive(Debug)]
pub struct ScopeNode {
    pub name: String,
    pub kind: ElementKind,
    /// Header line, 1-indexed.
    pub line: usize,
    /// Header indentation (raw character count).
    pub indent: usize,
    /// Last line of the scope's extent, inclusive.
    pub end_line: usize,
    /// Indexes into `ScopeTree::nodes`.
    pub children: Vec<usize>,
}

/// Where a block belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Module,
    /// Index into `ScopeTree::nodes`.
    Element(usize),
}

/// All headers plus one attachment per scanned block.
#[derive(Debug)]
pub struct ScopeTree {
    /// Flat arena; `roots` and `children` index into it.
    pub nodes: Vec<ScopeNode>,
    pub roots: Vec<usize>,
    /// Parallel to the scanner's block list.
    pub attachments: Vec<Attachment>,
}

struct Frame {
    node: usize,
    indent: usize,
    /// Depth of the first body line, once seen.
    body_indent: Option<usize>,
    /// A trailing block attached here; body attachments are closed.
    sealed: bool,
}

/// Resolve headers and block attachments for one source text.
/// Block interiors are skipped, so definition-shaped content lines inside
/// a block never become elements.
pub fn resolve(source: &str, blocks: &[RawBlock]) -> ScopeTree {
    let lines: Vec<&str> = source.lines().collect();
    let mut nodes: Vec<ScopeNode> = Vec::new();
    let mut roots: Vec<usize> = Vec::new();
    let mut attachments = vec![Attachment::Module; blocks.len()];

    let mut stack: Vec<Frame> = Vec::new();
    let mut last_nonblank = 0usize;
    let mut next_block = 0usize;

    let mut i = 0;
    while i < lines.len() {
        let lineno = i + 1;

        // Block event: attach, then jump past the block's content.
        if next_block < blocks.len() && blocks[next_block].start_line == lineno {
            let block = &blocks[next_block];
            attachments[next_block] = attach(&mut stack, &mut nodes, block, last_nonblank);
            last_nonblank = block.end_line;
            i = block.end_line;
            next_block += 1;
            continue;
        }

        let line = lines[i];
        if line.trim().is_empty() {
            i += 1;
            continue;
        }

        let indent = indent_of(line);

        if let Some((name, kind)) = match_header(line) {
            // A header at depth <= a scope's own depth closes that scope.
            while stack.last().is_some_and(|f| f.indent >= indent) {
                let frame = stack.pop().unwrap();
                nodes[frame.node].end_line = last_nonblank;
            }

            let parent = stack.last().map(|f| f.node);
            if let Some(top) = stack.last_mut() {
                if top.body_indent.is_none() && indent > top.indent {
                    top.body_indent = Some(indent);
                }
            }

            let idx = nodes.len();
            nodes.push(ScopeNode {
                name,
                kind,
                line: lineno,
                indent,
                end_line: lineno,
                children: Vec::new(),
            });
            match parent {
                Some(p) => nodes[p].children.push(idx),
                None => roots.push(idx),
            }
            stack.push(Frame {
                node: idx,
                indent,
                body_indent: None,
                sealed: false,
            });

            // Signature spanning multiple lines: consume until brackets
            // close, stopping short of any scanned block keyword line.
            let mut balance = bracket_balance(line);
            let mut k = i;
            while balance > 0 && k + 1 < lines.len() {
                let next_is_block =
                    next_block < blocks.len() && blocks[next_block].start_line == k + 2;
                if next_is_block {
                    break;
                }
                k += 1;
                balance += bracket_balance(lines[k]);
            }
            last_nonblank = k + 1;
            i = k + 1;
            continue;
        }

        // Plain statement: never closes a scope, but the first one after a
        // header fixes that scope's body indentation.
        if let Some(top) = stack.last_mut() {
            if top.body_indent.is_none() && indent > top.indent {
                top.body_indent = Some(indent);
            }
        }
        last_nonblank = lineno;
        i += 1;
    }

    while let Some(frame) = stack.pop() {
        nodes[frame.node].end_line = last_nonblank;
    }

    ScopeTree {
        nodes,
        roots,
        attachments,
    }
}

fn attach(
    stack: &mut Vec<Frame>,
    nodes: &mut [ScopeNode],
    block: &RawBlock,
    last_nonblank: usize,
) -> Attachment {
    let d = block.indent;

    // A block at depth <= a scope's own depth closes deeper scopes.
    while stack.last().is_some_and(|f| f.indent > d) {
        let frame = stack.pop().unwrap();
        nodes[frame.node].end_line = last_nonblank;
    }

    if let Some(top) = stack.last_mut() {
        // Rule 1: trailing block at the definition's own depth.
        if top.indent == d {
            top.sealed = true;
            return Attachment::Element(top.node);
        }
        // Rule 2, first-body-line case: the block opens the scope's body.
        if top.body_indent.is_none() && d > top.indent && !top.sealed {
            top.body_indent = Some(d);
            return Attachment::Element(top.node);
        }
    }

    // Rule 2: innermost still-open scope whose body depth matches.
    for frame in stack.iter().rev() {
        if frame.body_indent == Some(d) && !frame.sealed {
            return Attachment::Element(frame.node);
        }
    }

    // Rule 3: module fallback, never dropped.
    Attachment::Module
}

fn match_header(line: &str) -> Option<(String, ElementKind)> {
    if let Some(caps) = RE_DEF.captures(line) {
        return Some((caps[1].to_string(), ElementKind::Function));
    }
    if let Some(caps) = RE_CLASS.captures(line) {
        return Some((caps[1].to_string(), ElementKind::Class));
    }
    None
}

/// Net bracket balance of one line, ignoring brackets inside string
/// literals and after a comment hash.
fn bracket_balance(line: &str) -> i32 {
    let mut balance = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in line.chars() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => quote = Some(ch),
            '(' | '[' | '{' => balance += 1,
            ')' | ']' | '}' => balance -= 1,
            '#' => break,
            _ => {}
        }
    }
    balance
}
