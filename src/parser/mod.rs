//! Parser pipeline from raw source text to a `SourceDocument`.

pub mod doc;
pub mod scan;
pub mod scope;

use crate::model::{Block, BlockKind, DocBlock, Element, SourceDocument, TestBlock};
use scan::RawBlock;
use scope::{Attachment, ScopeTree};

/// Parse source text into a document model.
///
/// Pure and infallible: malformed content inside blocks degrades to setup
/// or unparseable statements, structural ambiguity falls back to module
/// attachment, and the same input always yields a structurally identical
/// model. I/O and error reporting stay at the caller.
pub fn parse(path: &str, source: &str) -> SourceDocument {
    let raw = scan::scan(source);
    let tree = scope::resolve(source, &raw);

    let mut module_blocks = Vec::new();
    let mut attached: Vec<Vec<Block>> = (0..tree.nodes.len()).map(|_| Vec::new()).collect();

    for (raw_block, attachment) in raw.iter().zip(&tree.attachments) {
        let block = build_block(raw_block);
        match attachment {
            Attachment::Module => module_blocks.push(block),
            Attachment::Element(node) => attached[*node].push(block),
        }
    }

    let mut elements: Vec<Element> = tree
        .roots
        .iter()
        .map(|&root| build_element(&tree, root, &mut attached))
        .collect();
    elements.sort_by_key(|e| e.start_line);
    module_blocks.sort_by_key(Block::start_line);

    SourceDocument {
        path: path.to_string(),
        elements,
        blocks: module_blocks,
    }
}

fn build_block(raw: &RawBlock) -> Block {
    let content = scan::dedent(&raw.lines);
    match raw.kind {
        BlockKind::Test => {
            let statements = test::parse(&content);
            Block::Test(TestBlock {
                start_line: raw.start_line,
                end_line: raw.end_line,
                indent: raw.indent,
                raw: content,
                statements,
            })
        }
        BlockKind::Doc => {
            let (description, sections) = doc::parse(&content);
            Block::Doc(DocBlock {
                start_line: raw.start_line,
                end_line: raw.end_line,
                indent: raw.indent,
                raw: content,
                description,
                sections,
            })
        }
    }
}

/// Blocks are attached per arena node; children and blocks come out
/// sorted by start line at every level.
fn build_element(tree: &ScopeTree, index: usize, attached: &mut [Vec<Block>]) -> Element {
    let node = &tree.nodes[index];
    let mut blocks = std::mem::take(&mut attached[index]);
    blocks.sort_by_key(Block::start_line);

    let mut children: Vec<Element> = node
        .children
        .iter()
        .map(|&child| build_element(tree, child, attached))
        .collect();
    children.sort_by_key(|e| e.start_line);

    Element {
        name: node.name.clone(),
        kind: node.kind,
        start_line: node.line,
        end_line: node.end_line,
        indent: node.indent,
        blocks,
        children,
    }
}
