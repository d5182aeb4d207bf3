//! Store configuration.
//!
//! # Responsibility
//! - Describe how to open the user store and where to send logs.
//! - Deserialize from any serde source (JSON/YAML/TOML chosen by the host).
//!
//! # Invariants
//! - Unknown keys are rejected rather than silently ignored.
//! - A missing `path` means an in-memory database.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Settings for opening a user store connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Database file; `None` opens an in-memory database.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// How long a statement waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// One of `trace|debug|info|warn|error`; `None` uses the build default.
    #[serde(default)]
    pub log_level: Option<String>,
    /// Absolute directory for rolling log files; `None` leaves logging off.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            log_level: None,
            log_dir: None,
        }
    }
}

impl StoreConfig {
    /// File-backed config with default timeouts.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

#[cfg(test)]
mod tests {
    use super::StoreConfig;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn empty_object_uses_defaults() {
        let config: StoreConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.busy_timeout(), Duration::from_secs(5));
        assert!(config.path.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: StoreConfig = serde_json::from_str(
            r#"{"path":"/tmp/users.db","busy_timeout_ms":250,"log_level":"warn"}"#,
        )
        .unwrap();
        assert_eq!(config.path, Some(PathBuf::from("/tmp/users.db")));
        assert_eq!(config.busy_timeout(), Duration::from_millis(250));
        assert_eq!(config.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = serde_json::from_str::<StoreConfig>(r#"{"pool_size":4}"#).unwrap_err();
        assert!(err.to_string().contains("pool_size"));
    }
}
