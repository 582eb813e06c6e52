//! Configuration loading.
//!
//! Reads `config.toml` from the docent config directory. Every field has a
//! default, so a missing file or a partial file is fine.

use crate::paths::DocentPaths;
use docent_core::{DocentError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendConfig,
}

/// Settings for the generative backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub model: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Loads configuration for the application.
pub struct ConfigService;

impl ConfigService {
    /// Loads `config.toml` from the config directory of `paths`.
    pub fn load(paths: &DocentPaths) -> Result<AppConfig> {
        let path = paths
            .config_file()
            .map_err(|e| DocentError::config(format!("Failed to get config path: {}", e)))?;
        Self::load_from(&path)
    }

    /// Loads configuration from `path`, returning defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;

        if config.backend.model.trim().is_empty() {
            return Err(DocentError::config("backend.model must not be empty"));
        }
        if config.backend.request_timeout_secs == 0 {
            return Err(DocentError::config(
                "backend.request_timeout_secs must be greater than zero",
            ));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigService::load(&DocentPaths::new(Some(temp_dir.path()))).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.backend.model, "gemini-2.5-pro");
        assert_eq!(config.backend.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[backend]\nmodel = \"gemini-2.5-flash\"\n").unwrap();

        let config = ConfigService::load_from(&path).unwrap();

        assert_eq!(config.backend.model, "gemini-2.5-flash");
        assert_eq!(config.backend.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.backend.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_invalid_toml_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[backend\nmodel = ").unwrap();

        let err = ConfigService::load_from(&path).unwrap_err();
        assert!(matches!(err, DocentError::Serialization { ref format, .. } if format == "TOML"));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[backend]\nrequest_timeout_secs = 0\n").unwrap();

        assert!(matches!(
            ConfigService::load_from(&path),
            Err(DocentError::Config(_))
        ));
    }
}
