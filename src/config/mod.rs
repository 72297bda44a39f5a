//! Configuration discovery and merging subsystem.
//!
//! # Data Flow
//! ```text
//! working directory + Env snapshot
//!     → locator.rs (probe candidate file names, enforce uniqueness)
//!     → cache.rs (memoized reads) → loader.rs (TOML/JSON → Document)
//!     → merge.rs (deep merge override layers)
//!     → merged Document consumed by the caller
//!
//! On filesystem change:
//!     caller invalidates the cache for every watchable path
//!     → next resolve() reads fresh documents from disk
//! ```
//!
//! # Design Decisions
//! - Documents are untyped tables; merging is purely structural
//! - Per-file load failures degrade to an empty document and are reported
//!   through a hook; only the multiple-candidates violation is fatal
//! - All process-environment input flows through the [`Env`] snapshot

pub mod cache;
pub mod env;
pub mod loader;
pub mod locator;
pub mod merge;
pub mod resolver;

pub use cache::DocumentCache;
pub use env::Env;
pub use loader::{read_document, Document, LoadError};
pub use locator::{derive_affixed_path, locate_config_file, watchable_paths, DEFAULT_CANDIDATES};
pub use merge::{merge_all, merge_documents};
pub use resolver::{ConfigError, ConfigResolver};
