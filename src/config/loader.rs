//! Document loading from disk.
//!
//! # Responsibilities
//! - Read a config or mock file into an untyped [`Document`]
//! - Dispatch on extension (TOML vs JSON)
//! - Unwrap payloads nested under the conventional `default` key
//!
//! # Design Decisions
//! - Load failures are non-fatal: the caller-supplied error hook is invoked
//!   and an empty document is returned, so one broken file never aborts
//!   resolution as a whole
//! - A missing file is not an error; it reads as an empty document

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

/// An untyped configuration document: string keys to arbitrary values.
pub type Document = serde_json::Map<String, Value>;

/// Callback invoked for every recoverable load failure.
pub type ErrorHook<'a> = &'a mut dyn FnMut(LoadError);

/// Recoverable error while loading a single file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("{} must contain a table at the top level", path.display())]
    NotATable { path: PathBuf },
}

impl LoadError {
    /// Path of the file that failed to load.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Parse { path, .. }
            | LoadError::NotATable { path } => path,
        }
    }
}

/// A document may nest its payload under a conventional `default` key.
/// The wrapped shape wins when the key holds a table; anything else is flat.
#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentShape {
    Wrapped { default: Document },
    Flat(Document),
}

/// Load a document from `path`.
///
/// Missing files read as empty. Any other failure is reported through
/// `on_error` and likewise yields an empty document.
pub fn read_document(path: &Path, on_error: ErrorHook<'_>) -> Document {
    if !path.is_file() {
        return Document::new();
    }
    match try_read(path) {
        Ok(doc) => doc,
        Err(err) => {
            on_error(err);
            Document::new()
        }
    }
}

/// Load a document, propagating the failure instead of swallowing it.
pub fn try_read(path: &Path) -> Result<Document, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let value: Value = if is_toml {
        toml::from_str(&raw).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        serde_json::from_str(&raw).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    match serde_json::from_value::<DocumentShape>(value) {
        Ok(DocumentShape::Wrapped { default }) => Ok(default),
        Ok(DocumentShape::Flat(doc)) => Ok(doc),
        Err(_) => Err(LoadError::NotATable {
            path: path.to_path_buf(),
        }),
    }
}
