//! XDG-compliant path resolution for guardrail.
//!
//! Follows the XDG Base Directory Specification: configuration under
//! `$XDG_CONFIG_HOME/guardrail/`, the database under `$XDG_DATA_HOME/guardrail/`.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::store::durable::DATABASE_FILE;

const APP_DIR: &str = "guardrail";

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(guardrail::paths::no_home),
        help("Set the HOME environment variable or pass --data-dir explicitly.")
    )]
    NoHome,

    #[error("failed to create directory: {path}")]
    #[diagnostic(
        code(guardrail::paths::create_dir),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type PathResult<T> = std::result::Result<T, PathError>;

/// Directories guardrail reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardrailPaths {
    /// `$XDG_CONFIG_HOME/guardrail/`
    pub config_dir: PathBuf,
    /// `$XDG_DATA_HOME/guardrail/`
    pub data_dir: PathBuf,
}

impl GuardrailPaths {
    /// Resolve XDG directories from environment variables with standard fallbacks.
    pub fn resolve() -> PathResult<Self> {
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .map_err(|_| PathError::NoHome)?;

        let xdg = |var: &str, fallback: &str| {
            std::env::var(var)
                .map(PathBuf::from)
                .unwrap_or_else(|_| home.join(fallback))
                .join(APP_DIR)
        };

        Ok(Self {
            config_dir: xdg("XDG_CONFIG_HOME", ".config"),
            data_dir: xdg("XDG_DATA_HOME", ".local/share"),
        })
    }

    /// Same layout, with the database kept in `data_dir` instead.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Create all directories. Idempotent.
    pub fn ensure_dirs(&self) -> PathResult<()> {
        for dir in [&self.config_dir, &self.data_dir] {
            create_dir(dir)?;
        }
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Path to the redb database.
    pub fn database_file(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

fn create_dir(dir: &Path) -> PathResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| PathError::CreateDir {
        path: dir.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixed(root: &Path) -> GuardrailPaths {
        GuardrailPaths {
            config_dir: root.join("cfg/guardrail"),
            data_dir: root.join("data/guardrail"),
        }
    }

    #[test]
    fn resolved_paths_end_in_app_dir() {
        // Env vars are not mutated here: that is unsafe in edition 2024.
        let paths = GuardrailPaths::resolve().unwrap();
        assert!(paths.config_dir.ends_with(APP_DIR));
        assert!(paths.data_dir.ends_with(APP_DIR));
    }

    #[test]
    fn files_derive_from_dirs() {
        let paths = fixed(Path::new("/x"));
        assert_eq!(paths.config_file(), PathBuf::from("/x/cfg/guardrail/config.toml"));
        assert_eq!(
            paths.database_file(),
            PathBuf::from("/x/data/guardrail/guardrail.redb")
        );
        let moved = paths.with_data_dir("/elsewhere");
        assert_eq!(moved.database_file(), PathBuf::from("/elsewhere/guardrail.redb"));
    }

    #[test]
    fn ensure_dirs_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let paths = fixed(dir.path());
        paths.ensure_dirs().unwrap();
        paths.ensure_dirs().unwrap();
        assert!(paths.data_dir.is_dir());
        assert!(paths.config_dir.is_dir());
    }
}
