//! Request-mocking subsystem for the dev server.
//!
//! # Data Flow
//! ```text
//! mock/**/*.{toml,json} + pages/**/_mock.{toml,json}
//!     → data.rs (scan, read through the document cache)
//!     → table.rs (typed entries, validated up front)
//!     → store.rs (atomic table reference)
//!     → middleware.rs (tower layer: match or delegate)
//!
//! On filesystem change:
//!     watcher.rs forwards the event over a channel
//!     → reload task invalidates the cache and rebuilds the table
//!     → store swap; in-flight requests keep the prior table
//! ```
//!
//! # Design Decisions
//! - The table is immutable once published; a reload builds a fresh one
//! - Load errors accumulate in a shared list the dev server can surface;
//!   they never fail the request path

pub mod data;
pub mod matcher;
pub mod middleware;
pub mod store;
pub mod table;
pub mod watcher;

pub use data::{load_mock_table, mock_paths, MockPaths, MockSources};
pub use matcher::PathPattern;
pub use middleware::{shared_errors, MockLayer, MockMiddleware, MockOptions, MockService, SharedErrors};
pub use store::MockStore;
pub use table::{MockEntry, MockError, MockResponse, MockTable};
