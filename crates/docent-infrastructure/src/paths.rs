//! Unified path management for docent files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/docent/            # Config directory (platform default)
//! ├── config.toml              # Application configuration
//! ├── secret.json              # API credential
//! └── logs/                    # Application logs
//!     └── docent.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "docent";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves every file location docent uses.
///
/// With no base path the platform config directory is used
/// (`dirs::config_dir()/docent`); a base path replaces it entirely, which is
/// how tests and `--config-dir` relocate everything.
#[derive(Debug, Clone, Default)]
pub struct DocentPaths {
    base: Option<PathBuf>,
}

impl DocentPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the docent configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Returns the path to config.toml.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secret file.
    ///
    /// # Security Note
    ///
    /// The file is written with 600 permissions on Unix.
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}
