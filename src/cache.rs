//! Content-hash parse cache.
//!
//! An explicit object owned by the caller, never process-global state.
//! Entries are keyed by path and guarded by a content hash: a hit hands
//! out the shared parsed model, a miss re-parses and replaces the entry.
//! The cache only skips recomputation; observable output never differs
//! from calling the parser directly.

use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::model::SourceDocument;
use crate::parser;

#[derive(Default)]
pub struct ParseCache {
    entries: HashMap<String, CacheEntry>,
}

struct CacheEntry {
    hash: [u8; 32],
    document: Arc<SourceDocument>,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `source`, reusing the cached model while the content at
    /// `path` stays unchanged.
    pub fn parse(&mut self, path: &str, source: &str) -> Arc<SourceDocument> {
        let hash: [u8; 32] = Sha256::digest(source.as_bytes()).into();
        if let Some(entry) = self.entries.get(path) {
            if entry.hash == hash {
                return Arc::clone(&entry.document);
            }
        }

        let document = Arc::new(parser::parse(path, source));
        self.entries.insert(
            path.to_string(),
            CacheEntry {
                hash,
                document: Arc::clone(&document),
            },
        );
        document
    }

    pub fn invalidate(&mut self, path: &str) {
        self.entries.remove(path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
