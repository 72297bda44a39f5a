//! Structural document merging.
//!
//! # Design Decisions
//! - Merging is purely structural; no schema is consulted
//! - Tables merge recursively, the overlay winning on scalar conflicts
//! - Arrays are replaced wholesale, never concatenated

use serde_json::Value;

use crate::config::loader::Document;

/// Deep-merge `overlay` into `base`.
///
/// Keys present in both are merged recursively when both values are tables;
/// otherwise the overlay value wins.
pub fn merge_documents(base: &mut Document, overlay: Document) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_documents(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Merge a sequence of documents in precedence order (lowest first).
pub fn merge_all<I>(documents: I) -> Document
where
    I: IntoIterator<Item = Document>,
{
    let mut merged = Document::new();
    for doc in documents {
        merge_documents(&mut merged, doc);
    }
    merged
}
