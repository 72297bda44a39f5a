//! Mock data loading: file discovery and table construction.
//!
//! # Responsibilities
//! - Resolve the fixed mock locations for a working directory
//! - Discover mock files under `mock/` and per-page `_mock.*` files
//! - Build a complete [`MockTable`], collecting per-file errors
//!
//! # Design Decisions
//! - Files are visited in sorted order so entry precedence is deterministic
//! - `mock.exclude` glob patterns from the config document skip files by
//!   their cwd-relative path
//! - A broken file contributes nothing but never stops the scan

use std::path::{Path, PathBuf};

use glob::Pattern;
use serde_json::Value;
use walkdir::WalkDir;

use crate::config::cache::DocumentCache;
use crate::config::loader::Document;
use crate::mock::table::{parse_entries, MockError, MockTable};

/// Mock file extensions recognized by the scanner.
const MOCK_EXTENSIONS: [&str; 2] = ["toml", "json"];

/// File stem of per-page mock files nested under the pages directory.
pub const PAGE_MOCK_STEM: &str = "_mock";

/// Fixed mock-related locations for a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockPaths {
    /// Directory holding project-level mock files.
    pub mock_dir: PathBuf,
    /// Primary config file.
    pub config_file: PathBuf,
    /// Config file with the alternative extension.
    pub config_file_alt: PathBuf,
}

/// Resolve the fixed mock locations under `cwd`.
pub fn mock_paths(cwd: &Path) -> MockPaths {
    MockPaths {
        mock_dir: cwd.join("mock"),
        config_file: cwd.join(".devmockrc.toml"),
        config_file_alt: cwd.join(".devmockrc.json"),
    }
}

/// Inputs for one mock table build.
pub struct MockSources<'a> {
    /// Project working directory.
    pub cwd: &'a Path,
    /// Absolute pages directory, scanned for per-page `_mock.*` files.
    pub pages_dir: &'a Path,
    /// Resolved project config; `mock.exclude` patterns are honored.
    pub config: &'a Document,
    /// Shared document cache; reads go through it.
    pub cache: &'a DocumentCache,
}

fn has_mock_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| MOCK_EXTENSIONS.contains(&ext))
}

fn is_page_mock(path: &Path) -> bool {
    has_mock_extension(path) && path.file_stem().is_some_and(|stem| stem == PAGE_MOCK_STEM)
}

/// Collect files under `root` (sorted) that pass `keep`.
fn scan(root: &Path, keep: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| keep(path))
        .collect()
}

/// `mock.exclude` patterns from the config document.
fn exclude_patterns(config: &Document, on_error: &mut dyn FnMut(MockError)) -> Vec<Pattern> {
    let Some(Value::Array(raw)) = config
        .get("mock")
        .and_then(|mock| mock.get("exclude"))
    else {
        return Vec::new();
    };

    let mut patterns = Vec::new();
    for value in raw {
        let Some(text) = value.as_str() else { continue };
        match Pattern::new(text) {
            Ok(pattern) => patterns.push(pattern),
            Err(e) => on_error(MockError::ExcludePattern {
                pattern: text.to_string(),
                message: e.to_string(),
            }),
        }
    }
    patterns
}

fn is_excluded(path: &Path, cwd: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let relative = path.strip_prefix(cwd).unwrap_or(path);
    let relative = relative.to_string_lossy().replace('\\', "/");
    patterns.iter().any(|pattern| pattern.matches(&relative))
}

/// Build the complete mock table for the given sources.
///
/// Every discovered file is read through the cache and converted; load and
/// entry failures are reported through `on_error` and the remaining files
/// still contribute their routes.
pub fn load_mock_table(sources: &MockSources<'_>, on_error: &mut dyn FnMut(MockError)) -> MockTable {
    let MockPaths { mock_dir, .. } = mock_paths(sources.cwd);

    let mut files = scan(&mock_dir, has_mock_extension);
    files.extend(scan(sources.pages_dir, is_page_mock));

    let patterns = exclude_patterns(sources.config, on_error);

    let mut entries = Vec::new();
    for file in files {
        if is_excluded(&file, sources.cwd, &patterns) {
            tracing::debug!(path = %file.display(), "mock file excluded by config");
            continue;
        }
        let doc = sources.cache.load(&file, &mut |e| on_error(MockError::Load(e)));
        entries.extend(parse_entries(&file, doc, on_error));
    }

    tracing::debug!(routes = entries.len(), "mock table built");
    MockTable::new(entries)
}
