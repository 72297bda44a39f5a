//! devmock: config discovery/merging and dev-time request mocking for a
//! web-application build tool.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────┐
//!                  │                     DEVMOCK                      │
//!                  │                                                  │
//!   cwd + env ─────┼─▶ config: locate → load (cached) → deep merge ───┼─▶ merged Document
//!                  │                                                  │
//!                  │   mock files ──▶ table build ──▶ atomic store    │
//!                  │        ▲                             │           │
//!                  │   fs watcher ── reload task ─────────┘           │
//!                  │                                                  │
//!   request ───────┼─▶ mock middleware: match? mock response : inner ─┼─▶ response
//!                  └──────────────────────────────────────────────────┘
//! ```
//!
//! Two loosely related components:
//! - [`config`]: finds at most one primary config file under a working
//!   directory and deep-merges it with env-specific and `.local` overrides
//!   on top of a caller default.
//! - [`mock`]: loads mock route definitions, hot-reloads them on filesystem
//!   changes, and exposes a tower middleware that serves matching canned
//!   responses or delegates to the inner service.

pub mod config;
pub mod mock;
pub mod observability;

pub use config::{ConfigError, ConfigResolver, Document, DocumentCache, Env};
pub use mock::{MockLayer, MockMiddleware, MockOptions, MockStore, MockTable};
