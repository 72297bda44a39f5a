//! Structured logging setup.
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Log level configurable via `RUST_LOG`, defaulting to crate-level debug
//! - Init is idempotent so embedding tools and tests can call it freely

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber for a host dev server.
///
/// Honors `RUST_LOG`; falls back to `devmock=debug`. Safe to call more than
/// once; later calls are no-ops.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devmock=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
