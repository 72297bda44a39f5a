//! Filesystem watcher driving mock hot reload.
//!
//! # Data Flow
//! ```text
//! notify backend thread
//!     → relevance filter (watched roots + per-page _mock files)
//!     → tokio mpsc channel
//!     → single reload task (invalidate cache, rebuild table, swap)
//! ```
//!
//! # Design Decisions
//! - Events funnel through one channel consumed by one task, so reloads are
//!   strictly sequential and never overlap
//! - The pages directory is watched recursively but only `_mock.{toml,json}`
//!   files under it are relevant; anything under `mock/` and the config
//!   file variants always are
//! - Watch roots that do not exist yet are skipped rather than failing setup

use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::mock::data::PAGE_MOCK_STEM;
use crate::mock::middleware::Reloader;

/// The locations the watcher tracks.
pub(crate) struct WatchTargets {
    pub mock_dir: PathBuf,
    pub config_file: PathBuf,
    pub config_file_alt: PathBuf,
    pub pages_dir: PathBuf,
}

impl WatchTargets {
    /// Does a change to `path` warrant a mock reload?
    fn is_relevant(&self, path: &Path) -> bool {
        if path.starts_with(&self.mock_dir)
            || path == self.config_file
            || path == self.config_file_alt
        {
            return true;
        }
        path.starts_with(&self.pages_dir)
            && path.file_stem().is_some_and(|stem| stem == PAGE_MOCK_STEM)
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| matches!(ext, "toml" | "json"))
    }
}

/// Start watching and spawn the reload task.
///
/// The returned watcher must be kept alive; dropping it stops event
/// delivery. Must be called within a tokio runtime.
pub(crate) fn start(
    targets: WatchTargets,
    reloader: std::sync::Arc<Reloader>,
) -> Result<RecommendedWatcher, notify::Error> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let roots = [
        (targets.mock_dir.clone(), RecursiveMode::Recursive),
        (targets.config_file.clone(), RecursiveMode::NonRecursive),
        (targets.config_file_alt.clone(), RecursiveMode::NonRecursive),
        (targets.pages_dir.clone(), RecursiveMode::Recursive),
    ];

    let mut watcher = RecommendedWatcher::new(
        move |result: notify::Result<Event>| match result {
            Ok(event) => {
                if let Some(path) = event.paths.iter().find(|p| targets.is_relevant(p)) {
                    let _ = tx.send((event.kind.clone(), path.clone()));
                }
            }
            Err(e) => tracing::error!(error = ?e, "mock watch error"),
        },
        Config::default(),
    )?;

    for (root, mode) in roots {
        if root.exists() {
            watcher.watch(&root, mode)?;
        } else {
            tracing::debug!(path = %root.display(), "watch root not present, skipping");
        }
    }

    tokio::spawn(async move {
        while let Some((kind, path)) = rx.recv().await {
            tracing::debug!(event = ?kind, path = %path.display(), "mock source changed, reloading");
            reloader.invalidate_and_reload();
        }
    });

    tracing::info!("mock watcher started");
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets() -> WatchTargets {
        WatchTargets {
            mock_dir: PathBuf::from("/proj/mock"),
            config_file: PathBuf::from("/proj/.devmockrc.toml"),
            config_file_alt: PathBuf::from("/proj/.devmockrc.json"),
            pages_dir: PathBuf::from("/proj/src/pages"),
        }
    }

    #[test]
    fn mock_dir_and_config_files_are_relevant() {
        let targets = targets();
        assert!(targets.is_relevant(Path::new("/proj/mock/api.toml")));
        assert!(targets.is_relevant(Path::new("/proj/mock/nested/users.json")));
        assert!(targets.is_relevant(Path::new("/proj/.devmockrc.toml")));
        assert!(targets.is_relevant(Path::new("/proj/.devmockrc.json")));
    }

    #[test]
    fn only_page_mock_files_are_relevant_under_pages() {
        let targets = targets();
        assert!(targets.is_relevant(Path::new("/proj/src/pages/home/_mock.toml")));
        assert!(targets.is_relevant(Path::new("/proj/src/pages/_mock.json")));
        assert!(!targets.is_relevant(Path::new("/proj/src/pages/home/page.toml")));
        assert!(!targets.is_relevant(Path::new("/proj/src/pages/home/_mock.txt")));
    }

    #[test]
    fn unrelated_paths_are_ignored() {
        let targets = targets();
        assert!(!targets.is_relevant(Path::new("/proj/README.md")));
        assert!(!targets.is_relevant(Path::new("/other/mock/api.toml")));
    }
}
