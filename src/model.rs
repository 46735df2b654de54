//! Format-agnostic data model for parsed source files.

/// One dedented content line with its original 1-indexed source line.
#[derive(Debug, Clone)]
pub struct ContentLine {
    pub line: usize,
    pub text: String,
}

/// Complete parsed document for a single source file.
///
/// Rebuilt from scratch on every parse; generators treat it as read-only.
#[derive(Debug, Default)]
pub struct SourceDocument {
    /// Opaque identifier, usually the file path ("<stdin>" in pipe mode).
    pub path: String,
    /// Top-level functions and classes, sorted by start line.
    pub elements: Vec<Element>,
    /// Module-level blocks, sorted by start line.
    pub blocks: Vec<Block>,
}

impl SourceDocument {
    /// Total statements across all test blocks that could not be parsed.
    pub fn unparseable_count(&self) -> usize {
        let mut n = count_unparseable(&self.blocks);
        for element in &self.elements {
            n += element.unparseable_count();
        }
        n
    }

    /// Total assertions across all test blocks.
    pub fn assertion_count(&self) -> usize {
        let mut n = count_assertions(&self.blocks);
        for element in &self.elements {
            n += element.assertion_count();
        }
        n
    }
}

/// Which keyword opened a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Test,
    Doc,
}

/// A `def` or `class` header that blocks can attach to.
#[derive(Debug)]
pub struct Element {
    pub name: String,
    pub kind: ElementKind,
    /// Line of the `def`/`class` header, 1-indexed.
    pub start_line: usize,
    /// Last line of the element's extent, inclusive.
    pub end_line: usize,
    /// Raw leading-whitespace count of the header line.
    pub indent: usize,
    /// Attached blocks, sorted by start line.
    pub blocks: Vec<Block>,
    /// Methods and nested classes, sorted by start line.
    pub children: Vec<Element>,
}

impl Element {
    fn unparseable_count(&self) -> usize {
        let mut n = count_unparseable(&self.blocks);
        for child in &self.children {
            n += child.unparseable_count();
        }
        n
    }

    fn assertion_count(&self) -> usize {
        let mut n = count_assertions(&self.blocks);
        for child in &self.children {
            n += child.assertion_count();
        }
        n
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Function,
    Class,
}

/// An embedded block. The variant set is closed and exhaustively matched
/// by every consumer.
#[derive(Debug)]
pub enum Block {
    Test(TestBlock),
    Doc(DocBlock),
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Test(_) => BlockKind::Test,
            Block::Doc(_) => BlockKind::Doc,
        }
    }

    /// Line of the `test:`/`doc:` keyword.
    pub fn start_line(&self) -> usize {
        match self {
            Block::Test(b) => b.start_line,
            Block::Doc(b) => b.start_line,
        }
    }

    /// Last non-blank content line (the keyword line for empty blocks).
    pub fn end_line(&self) -> usize {
        match self {
            Block::Test(b) => b.end_line,
            Block::Doc(b) => b.end_line,
        }
    }
}

/// A `test:` block and its parsed statements.
#[derive(Debug, Default)]
pub struct TestBlock {
    pub start_line: usize,
    pub end_line: usize,
    /// Keyword-line indentation (raw character count).
    pub indent: usize,
    /// Dedented content, blank lines excluded.
    pub raw: Vec<ContentLine>,
    pub statements: Vec<TestStatement>,
}

/// A `doc:` block and its parsed content.
#[derive(Debug, Default)]
pub struct DocBlock {
    pub start_line: usize,
    pub end_line: usize,
    pub indent: usize,
    /// Dedented content, blank lines excluded.
    pub raw: Vec<ContentLine>,
    /// Free-text paragraphs before the first section header.
    pub description: Vec<String>,
    pub sections: Vec<DocSection>,
}

/// One statement inside a test block, in source order.
#[derive(Debug)]
pub enum TestStatement {
    Setup(Setup),
    Assertion(Assertion),
    /// Left structurally open at end of block; skipped by generators.
    Unparseable(Unparseable),
}

/// Opaque code executed for side effects before later assertions.
#[derive(Debug)]
pub struct Setup {
    /// First physical line, 1-indexed.
    pub line: usize,
    /// Verbatim code; embedded newlines keep relative indentation.
    pub code: String,
}

/// One testable expression/operator/description triple.
#[derive(Debug)]
pub struct Assertion {
    /// First physical line, 1-indexed. Stable key for live tooling.
    pub line: usize,
    /// Everything left of the final colon, verbatim.
    pub expression: String,
    pub operator: CompareOp,
    /// Inner text of the quoted description, escapes preserved as written.
    pub description: String,
    /// Quote character the description was written with.
    pub quote: char,
}

#[derive(Debug)]
pub struct Unparseable {
    pub line: usize,
    pub text: String,
}

/// Top-level comparison operators an assertion may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Is,
    IsNot,
    In,
    NotIn,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Is => "is",
            CompareOp::IsNot => "is not",
            CompareOp::In => "in",
            CompareOp::NotIn => "not in",
        }
    }
}

/// A structured subsection of a doc block.
#[derive(Debug)]
pub struct DocSection {
    pub kind: SectionKind,
    /// Parsed entries (Args/Raises).
    pub entries: Vec<DocEntry>,
    /// Raw lines for text-bodied sections (Returns, Examples, ...).
    pub text: Vec<ContentLine>,
}

/// Recognized section vocabulary. Header aliases (Arguments, Parameters,
/// Param, Return, ...) are folded into these kinds at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Args,
    Returns,
    Yields,
    Raises,
    Examples,
    Notes,
    SeeAlso,
    References,
}

impl SectionKind {
    /// Canonical display title used by the doc generator.
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Args => "Arguments",
            SectionKind::Returns => "Returns",
            SectionKind::Yields => "Yields",
            SectionKind::Raises => "Raises",
            SectionKind::Examples => "Examples",
            SectionKind::Notes => "Notes",
            SectionKind::SeeAlso => "See also",
            SectionKind::References => "References",
        }
    }
}

/// One named entry within Args/Raises.
#[derive(Debug)]
pub struct DocEntry {
    pub name: String,
    /// Optional `(type)` annotation.
    pub type_name: Option<String>,
    pub description: String,
    pub line: usize,
}

fn count_unparseable(blocks: &[Block]) -> usize {
    blocks
        .iter()
        .filter_map(|b| match b {
            Block::Test(t) => Some(t),
            Block::Doc(_) => None,
        })
        .flat_map(|t| &t.statements)
        .filter(|s| matches!(s, TestStatement::Unparseable(_)))
        .count()
}

fn count_assertions(blocks: &[Block]) -> usize {
    blocks
        .iter()
        .filter_map(|b| match b {
            Block::Test(t) => Some(t),
            Block::Doc(_) => None,
        })
        .flat_map(|t| &t.statements)
        .filter(|s| matches!(s, TestStatement::Assertion(_)))
        .count()
}
