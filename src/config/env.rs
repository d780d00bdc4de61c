//! Environment lookup seam
//!
//! Configuration is never read from `std::env` directly outside this file.
//! `ProcessEnv` serves the real process; `EnvMap` serves tests and embedders
//! that assemble settings themselves (optionally from a dotenv file).

use std::collections::{HashMap, HashSet};
use std::path::Path;

use thiserror::Error;
use tracing::warn;

/// Errors raised while resolving configuration values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read environment variable {key}: {reason}")]
    EnvLookup { key: String, reason: String },

    #[error("Failed to load dotenv file: {0}")]
    Dotenv(String),
}

/// Key -> string lookup
pub trait EnvSource: Send + Sync {
    /// `Ok(None)` when the key is unset; `Err` when the lookup itself failed
    fn lookup(&self, key: &str) -> Result<Option<String>, ConfigError>;

    /// Value for `key`, or `default` when unset, empty, or unreadable.
    ///
    /// A failed lookup is logged as a warning and never propagated.
    fn var_or(&self, key: &str, default: &str) -> String {
        match self.lookup(key) {
            Ok(Some(value)) if !value.is_empty() => value,
            Ok(_) => default.to_string(),
            Err(e) => {
                warn!(key, default, error = %e, "Environment lookup failed, using default");
                default.to_string()
            }
        }
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn lookup(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match std::env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(ConfigError::EnvLookup {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// In-memory environment
#[derive(Debug, Clone, Default)]
pub struct EnvMap {
    vars: HashMap<String, String>,
    unreadable: HashSet<String>,
}

impl EnvMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    /// Mark `key` as present but unreadable; lookups for it fail
    pub fn with_unreadable(mut self, key: &str) -> Self {
        self.unreadable.insert(key.to_string());
        self
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }

    /// Load every `KEY=value` pair from a dotenv file.
    ///
    /// Unlike `dotenvy::dotenv()`, nothing is written to the process
    /// environment.
    pub fn from_dotenv_file(path: &Path) -> Result<Self, ConfigError> {
        let iter = dotenvy::from_path_iter(path).map_err(|e| {
            ConfigError::Dotenv(format!("{}: {}", path.display(), e))
        })?;

        let mut env = Self::new();
        for item in iter {
            let (key, value) = item.map_err(|e| {
                ConfigError::Dotenv(format!("{}: {}", path.display(), e))
            })?;
            env.vars.insert(key, value);
        }
        Ok(env)
    }
}

impl EnvSource for EnvMap {
    fn lookup(&self, key: &str) -> Result<Option<String>, ConfigError> {
        if self.unreadable.contains(key) {
            return Err(ConfigError::EnvLookup {
                key: key.to_string(),
                reason: "value is not readable".to_string(),
            });
        }
        Ok(self.vars.get(key).cloned())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_env_map_lookup() {
        let env = EnvMap::new().with("EXCHANGE_NAME", "kraken");
        assert_eq!(env.lookup("EXCHANGE_NAME").unwrap().as_deref(), Some("kraken"));
        assert_eq!(env.lookup("MISSING").unwrap(), None);
    }

    #[test]
    fn test_env_map_unreadable_key_fails() {
        let env = EnvMap::new().with_unreadable("FIREBASE_PRIVATE_KEY");
        let err = env.lookup("FIREBASE_PRIVATE_KEY").unwrap_err();
        assert!(matches!(err, ConfigError::EnvLookup { ref key, .. } if key == "FIREBASE_PRIVATE_KEY"));
    }

    #[test]
    fn test_var_or_defaults() {
        let env = EnvMap::new()
            .with("SET", "value")
            .with("EMPTY", "")
            .with_unreadable("BROKEN");

        assert_eq!(env.var_or("SET", "default"), "value");
        assert_eq!(env.var_or("EMPTY", "default"), "default");
        assert_eq!(env.var_or("UNSET", "default"), "default");
        assert_eq!(env.var_or("BROKEN", "default"), "default");
    }

    #[test]
    fn test_env_map_from_dotenv_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "TRADING_MODE=live").unwrap();
        writeln!(file, "EXCHANGE_NAME=kraken").unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "FIREBASE_PRIVATE_KEY=\"line1\\nline2\"").unwrap();

        let env = EnvMap::from_dotenv_file(file.path()).unwrap();
        assert_eq!(env.var_or("TRADING_MODE", "paper"), "live");
        assert_eq!(env.var_or("EXCHANGE_NAME", "binance"), "kraken");
        assert!(env.lookup("FIREBASE_PRIVATE_KEY").unwrap().is_some());
    }

    #[test]
    fn test_env_map_from_missing_dotenv_file() {
        let result = EnvMap::from_dotenv_file(Path::new("/nonexistent/ecosystem.env"));
        assert!(matches!(result, Err(ConfigError::Dotenv(_))));
    }

    #[test]
    #[serial]
    fn test_process_env_lookup() {
        env::set_var("ECOSYSTEM_LOG_TEST_VAR", "present");
        assert_eq!(
            ProcessEnv.lookup("ECOSYSTEM_LOG_TEST_VAR").unwrap().as_deref(),
            Some("present")
        );

        env::remove_var("ECOSYSTEM_LOG_TEST_VAR");
        assert_eq!(ProcessEnv.lookup("ECOSYSTEM_LOG_TEST_VAR").unwrap(), None);
    }
}
