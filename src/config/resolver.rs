//! Config resolution: locate, load, and merge override layers.
//!
//! # Data Flow
//! ```text
//! cwd + Env
//!     → locator.rs (find the sole primary config file)
//!     → cache.rs / loader.rs (parse primary + affixed variants)
//!     → merge.rs (default ← primary ← .<env> ← .local)
//!     → merged Document handed to the caller
//! ```
//!
//! # Design Decisions
//! - Per-file load failures are reported through a hook and never abort
//!   resolution; only the multiple-candidates violation propagates
//! - The `.local` and `.<env>` variants only take effect when a primary
//!   config file exists; without one the caller default is returned as-is

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::cache::DocumentCache;
use crate::config::env::Env;
use crate::config::loader::{Document, ErrorHook};
use crate::config::locator::{derive_affixed_path, locate_config_file, watchable_paths};
use crate::config::merge::merge_documents;

/// Fatal config resolution error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("multiple config files were detected ({}), please keep only one", files.join(", "))]
    MultipleConfigFiles { files: Vec<String> },
}

/// Resolves the merged configuration for a working directory.
pub struct ConfigResolver {
    cwd: PathBuf,
    env: Env,
    cache: Arc<DocumentCache>,
}

impl ConfigResolver {
    /// Resolver with a private document cache.
    pub fn new(cwd: impl Into<PathBuf>, env: Env) -> Self {
        Self::with_cache(cwd, env, Arc::new(DocumentCache::new()))
    }

    /// Resolver sharing an existing document cache.
    pub fn with_cache(cwd: impl Into<PathBuf>, env: Env, cache: Arc<DocumentCache>) -> Self {
        Self {
            cwd: cwd.into(),
            env,
            cache,
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn cache(&self) -> &Arc<DocumentCache> {
        &self.cache
    }

    /// Locate the primary config file under this resolver's directory.
    pub fn locate_config_file(&self) -> Result<Option<PathBuf>, ConfigError> {
        locate_config_file(&self.cwd, &self.env)
    }

    /// Resolve the merged config, logging load failures via `tracing`.
    pub fn resolve(&self, default_config: Option<Document>) -> Result<Document, ConfigError> {
        self.resolve_with(default_config, &mut |err| {
            tracing::error!(error = %err, "failed to load config file");
        })
    }

    /// Resolve the merged config, reporting load failures to `on_error`.
    ///
    /// Precedence, lowest to highest: caller default → primary file →
    /// env-suffixed variant (selector set) → `.local` variant (dev mode).
    pub fn resolve_with(
        &self,
        default_config: Option<Document>,
        on_error: ErrorHook<'_>,
    ) -> Result<Document, ConfigError> {
        let mut merged = default_config.unwrap_or_default();

        let Some(primary) = self.locate_config_file()? else {
            return Ok(merged);
        };

        merge_documents(&mut merged, self.cache.load(&primary, &mut *on_error));

        if let Some(selector) = self.env.selector.clone() {
            let variant = derive_affixed_path(&primary, &selector);
            merge_documents(&mut merged, self.cache.load(&variant, &mut *on_error));
        }
        if self.env.development {
            let local = derive_affixed_path(&primary, "local");
            merge_documents(&mut merged, self.cache.load(&local, &mut *on_error));
        }

        Ok(merged)
    }

    /// Every path whose change can affect the resolved config.
    pub fn watchable_paths(&self) -> Vec<PathBuf> {
        watchable_paths(&self.cwd, &self.env)
    }

    /// Drop cached documents under every watchable path so the next
    /// [`resolve`](Self::resolve) reads from disk.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate(&self.watchable_paths());
    }
}
