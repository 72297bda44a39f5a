//! Process-environment snapshot for config resolution.
//!
//! # Design Decisions
//! - Environment is read once into a plain struct and passed explicitly;
//!   resolution code never touches `std::env` ambiently, so tests can
//!   construct any combination without mutating process state.

/// Comma-separated override list for the config candidate file names.
pub const CONFIG_FILE_VAR: &str = "DEVMOCK_CONFIG_FILE";

/// Selector for environment-suffixed config variants (e.g. `cloud` picks
/// `.devmockrc.cloud.toml`).
pub const ENV_SELECTOR_VAR: &str = "DEVMOCK_ENV";

/// Run mode; the value `development` enables `.local` overrides.
pub const MODE_VAR: &str = "DEVMOCK_MODE";

/// Snapshot of the environment variables that influence config resolution.
#[derive(Debug, Clone, Default)]
pub struct Env {
    /// Override list of candidate config file names (comma-separated).
    pub config_file: Option<String>,

    /// Active environment selector, if any.
    pub selector: Option<String>,

    /// True when running in development mode.
    pub development: bool,
}

impl Env {
    /// Capture the current process environment.
    pub fn from_process() -> Self {
        Self {
            config_file: non_empty(std::env::var(CONFIG_FILE_VAR).ok()),
            selector: non_empty(std::env::var(ENV_SELECTOR_VAR).ok()),
            development: std::env::var(MODE_VAR)
                .map(|v| v == "development")
                .unwrap_or(false),
        }
    }

    /// Convenience constructor for a fixed selector / mode combination.
    pub fn with(selector: Option<&str>, development: bool) -> Self {
        Self {
            config_file: None,
            selector: selector.map(str::to_string),
            development,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_env_is_inert() {
        let env = Env::default();
        assert!(env.config_file.is_none());
        assert!(env.selector.is_none());
        assert!(!env.development);
    }

    #[test]
    fn with_sets_selector_and_mode() {
        let env = Env::with(Some("cloud"), true);
        assert_eq!(env.selector.as_deref(), Some("cloud"));
        assert!(env.development);
    }
}
