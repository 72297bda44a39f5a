//! Config file discovery.
//!
//! # Responsibilities
//! - Probe a working directory for the primary config file
//! - Enforce the at-most-one-candidate invariant
//! - Derive affixed variant paths (`.local`, `.<env>`)
//! - Enumerate every location a watcher should track
//!
//! # Design Decisions
//! - Candidate names come from `DEVMOCK_CONFIG_FILE` when set, otherwise the
//!   fixed default list; discovery never recurses upward
//! - Two or more existing candidates is a fatal error naming all of them,
//!   never a silent first-wins pick

use std::path::{Path, PathBuf};

use crate::config::env::Env;
use crate::config::ConfigError;

/// Default candidate config file names, probed in order.
pub const DEFAULT_CANDIDATES: [&str; 4] = [
    ".devmockrc.toml",
    ".devmockrc.json",
    "config/config.toml",
    "config/config.json",
];

/// Candidate names to probe, honoring the env override list.
fn candidate_names(env: &Env) -> Vec<String> {
    match &env.config_file {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        None => DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect(),
    }
}

/// Locate the primary config file under `cwd`.
///
/// Returns the sole existing candidate's absolute path, `None` when no
/// candidate exists, and [`ConfigError::MultipleConfigFiles`] when more than
/// one does.
pub fn locate_config_file(cwd: &Path, env: &Env) -> Result<Option<PathBuf>, ConfigError> {
    let existing: Vec<String> = candidate_names(env)
        .into_iter()
        .filter(|name| cwd.join(name).is_file())
        .collect();

    if existing.len() > 1 {
        return Err(ConfigError::MultipleConfigFiles { files: existing });
    }
    Ok(existing.into_iter().next().map(|name| cwd.join(name)))
}

/// Insert `.affix` immediately before the final extension.
///
/// `.devmockrc.toml` + `local` → `.devmockrc.local.toml`. The resulting path
/// need not exist; this is a pure path transformation.
pub fn derive_affixed_path(path: &Path, affix: &str) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_extension(format!("{affix}.{ext}")),
        None => path.with_extension(affix),
    }
}

/// Every location whose modification can change the resolved config:
/// the `config/` directory, the fixed variant files, and the env-suffixed
/// variants when a selector is active.
pub fn watchable_paths(cwd: &Path, env: &Env) -> Vec<PathBuf> {
    let mut paths = vec![
        cwd.join("config"),
        cwd.join(".devmockrc.toml"),
        cwd.join(".devmockrc.json"),
        cwd.join(".devmockrc.local.toml"),
        cwd.join(".devmockrc.local.json"),
    ];
    if let Some(selector) = &env.selector {
        paths.push(cwd.join(format!(".devmockrc.{selector}.toml")));
        paths.push(cwd.join(format!(".devmockrc.{selector}.json")));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn no_candidate_resolves_to_none() {
        let dir = TempDir::new().unwrap();
        let found = locate_config_file(dir.path(), &Env::default()).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn single_candidate_resolves_to_its_absolute_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".devmockrc.toml"), "").unwrap();
        let found = locate_config_file(dir.path(), &Env::default()).unwrap();
        assert_eq!(found, Some(dir.path().join(".devmockrc.toml")));
    }

    #[test]
    fn multiple_candidates_fail_naming_both() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".devmockrc.toml"), "").unwrap();
        fs::create_dir(dir.path().join("config")).unwrap();
        fs::write(dir.path().join("config/config.toml"), "").unwrap();

        let err = locate_config_file(dir.path(), &Env::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(".devmockrc.toml"), "{message}");
        assert!(message.contains("config/config.toml"), "{message}");
    }

    #[test]
    fn env_override_replaces_the_candidate_list() {
        let dir = TempDir::new().unwrap();
        // Present but ignored: the override list does not include it.
        fs::write(dir.path().join(".devmockrc.toml"), "").unwrap();
        fs::write(dir.path().join("custom.toml"), "").unwrap();

        let env = Env {
            config_file: Some(" custom.toml , other.toml ,".to_string()),
            ..Env::default()
        };
        let found = locate_config_file(dir.path(), &env).unwrap();
        assert_eq!(found, Some(dir.path().join("custom.toml")));
    }

    #[test]
    fn affix_goes_before_the_final_extension_only() {
        assert_eq!(
            derive_affixed_path(Path::new("a/.devmockrc.toml"), "local"),
            PathBuf::from("a/.devmockrc.local.toml")
        );
        assert_eq!(
            derive_affixed_path(Path::new("x.test.toml"), "prod"),
            PathBuf::from("x.test.prod.toml")
        );
        assert_eq!(
            derive_affixed_path(Path::new("config"), "local"),
            PathBuf::from("config.local")
        );
    }

    #[test]
    fn watchable_paths_extend_when_selector_active() {
        let cwd = Path::new("/proj");
        let plain = watchable_paths(cwd, &Env::default());
        assert_eq!(plain.len(), 5);
        assert!(plain.contains(&PathBuf::from("/proj/config")));

        let with_env = watchable_paths(cwd, &Env::with(Some("cloud"), false));
        assert_eq!(with_env.len(), 7);
        assert!(with_env.contains(&PathBuf::from("/proj/.devmockrc.cloud.toml")));
    }
}
