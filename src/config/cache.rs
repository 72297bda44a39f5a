//! Shared document cache with prefix invalidation.
//!
//! # Responsibilities
//! - Memoize parsed documents by absolute path
//! - Drop entries under a set of root paths to force a fresh read
//!
//! # Design Decisions
//! - An explicit, injectable service rather than process-wide state; tests
//!   construct a fresh instance instead of fighting global caches
//! - Only successful loads are cached: a missing or broken file is retried
//!   on the next read, so a file created or fixed later is picked up
//! - Invalidation matches component-wise (`Path::starts_with`), the single
//!   matching rule used everywhere in this crate

use std::path::{Path, PathBuf};

use dashmap::DashMap;

use crate::config::loader::{read_document, Document, ErrorHook};

/// Concurrent cache of parsed documents keyed by path.
#[derive(Debug, Default)]
pub struct DocumentCache {
    entries: DashMap<PathBuf, Document>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` through the cache.
    ///
    /// Load failures go to `on_error` and yield an empty, uncached document.
    pub fn load(&self, path: &Path, on_error: ErrorHook<'_>) -> Document {
        if let Some(entry) = self.entries.get(path) {
            return entry.clone();
        }
        if !path.is_file() {
            return Document::new();
        }
        let mut failed = false;
        let doc = read_document(path, &mut |err| {
            failed = true;
            on_error(err);
        });
        if !failed {
            self.entries.insert(path.to_path_buf(), doc.clone());
        }
        doc
    }

    /// Drop every cached entry whose path lies under any of `roots`.
    pub fn invalidate(&self, roots: &[PathBuf]) {
        self.entries
            .retain(|path, _| !roots.iter().any(|root| path.starts_with(root)));
    }

    /// Number of cached documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
