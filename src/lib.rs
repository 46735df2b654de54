//! tdoc: embedded `test:`/`doc:` blocks for Python-style sources.
//!
//! Scans source text for indentation-delimited `test:` and `doc:` blocks,
//! attaches each to the function, class, or module it describes, and
//! generates pytest suites, markdown documentation, or a JSON lookup
//! index from the resulting model.
//!
//! Parsing is a pure function of the input text: malformed content inside
//! blocks degrades to setup or skipped statements instead of failing, and
//! repeated parses of the same text yield structurally identical models.
//! File and process concerns live in the binary, not here.

pub mod cache;
pub mod index;
pub mod model;
pub mod parser;
pub mod render;

pub use cache::ParseCache;
pub use index::DocumentIndex;
pub use model::SourceDocument;
pub use parser::parse;
pub use render::{create_renderer, Renderer};
