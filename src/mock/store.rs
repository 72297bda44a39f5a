//! Lock-free hot-swapped mock table reference.
//!
//! # Design Decisions
//! - Single writer (the reload path), many readers (request handling)
//! - A table is built in full before it is stored, so readers always see a
//!   complete table and never a mix of two versions
//! - `None` means "no table loaded yet" and reads as a universal miss

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::mock::table::MockTable;

/// Shared reference cell over the current mock table.
#[derive(Debug, Default)]
pub struct MockStore {
    current: ArcSwapOption<MockTable>,
}

impl MockStore {
    /// An empty store in the unset state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current table, or `None` before the first load completes.
    pub fn get(&self) -> Option<Arc<MockTable>> {
        self.current.load_full()
    }

    /// Replace the current table wholesale.
    pub fn swap(&self, table: MockTable) {
        self.current.store(Some(Arc::new(table)));
    }
}
