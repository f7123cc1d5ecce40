//! User configuration, persisted as TOML in `$XDG_CONFIG_HOME/guardrail/config.toml`.
//!
//! Every field has a default, so a missing or partial file is fine.
//! Command-line flags override whatever the file says.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::DEFAULT_EXPECTED_LINKS;

/// Errors from reading or writing the config file.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(guardrail::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(guardrail::config::parse),
        help("Check the TOML syntax in the config file, or delete it and run `guardrail init`.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(guardrail::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Settings for one guardrail user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailConfig {
    /// Owner recorded on new ideas; lists only show this owner's ideas.
    #[serde(default = "default_user")]
    pub user: String,
    /// Override for the database directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Resource target for ideas that set none.
    #[serde(default = "default_expected_links")]
    pub expected_links: u32,
    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_user() -> String {
    "guest".into()
}
fn default_expected_links() -> u32 {
    DEFAULT_EXPECTED_LINKS
}
fn default_log_filter() -> String {
    "warn".into()
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            user: default_user(),
            data_dir: None,
            expected_links: default_expected_links(),
            log_filter: default_log_filter(),
        }
    }
}

impl GuardrailConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load from `path`, or fall back to defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Write defaults to `path` unless a file is already there.
    ///
    /// Returns whether a new file was written.
    pub fn init(path: &Path) -> ConfigResult<bool> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save(path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = GuardrailConfig::default();
        assert_eq!(config.user, "guest");
        assert_eq!(config.expected_links, 5);
        assert_eq!(config.log_filter, "warn");
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: GuardrailConfig = toml::from_str("user = \"ana\"").unwrap();
        assert_eq!(config.user, "ana");
        assert_eq!(config.expected_links, 5);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");
        let config = GuardrailConfig {
            user: "ana".into(),
            data_dir: Some(PathBuf::from("/tmp/guardrail")),
            expected_links: 8,
            log_filter: "guardrail=debug".into(),
        };
        config.save(&path).unwrap();
        assert_eq!(GuardrailConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn init_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        assert!(GuardrailConfig::init(&path).unwrap());

        std::fs::write(&path, "user = \"kept\"\n").unwrap();
        assert!(!GuardrailConfig::init(&path).unwrap());
        assert_eq!(GuardrailConfig::load(&path).unwrap().user, "kept");
    }

    #[test]
    fn missing_file_is_default_but_bad_toml_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(
            GuardrailConfig::load_or_default(&path).unwrap(),
            GuardrailConfig::default()
        );
        std::fs::write(&path, "user = [").unwrap();
        assert!(matches!(
            GuardrailConfig::load_or_default(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
