//! Path resolution for ccf configuration and data files.
//!
//! All data is stored in `~/.ccf/` unless another root is given with
//! `--home` or `CCF_HOME`:
//! - `config.yaml` - Main configuration file
//! - `ccf.db` - SQLite database of finished sessions
//! - `ccf.log` - Log file written while the terminal UI is running

use std::path::PathBuf;

use crate::error::CcfError;

/// Paths to ccf configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.ccf/`
    pub root: PathBuf,
    /// Config file: `~/.ccf/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.ccf/ccf.db`
    pub database: PathBuf,
    /// Log file: `~/.ccf/ccf.log`
    pub log_file: PathBuf,
}

impl Paths {
    /// Create paths based on the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, CcfError> {
        let home = std::env::var("HOME")
            .map_err(|_| CcfError::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_root(PathBuf::from(home).join(".ccf")))
    }

    /// Use `root` when given, the home directory otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if no root is given and the home directory cannot
    /// be determined.
    pub fn resolve(root: Option<PathBuf>) -> Result<Self, CcfError> {
        root.map_or_else(Self::new, |r| Ok(Self::with_root(r)))
    }

    /// Create paths with a custom root directory.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("ccf.db"),
            log_file: root.join("ccf.log"),
            root,
        }
    }

    /// Ensure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), CcfError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                CcfError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }
        Ok(())
    }
}
