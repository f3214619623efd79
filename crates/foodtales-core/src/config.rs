//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: the
//! backend base URL, the keychain service name, request timeout, and the
//! last email used to sign in.
//!
//! Configuration is stored at `~/.config/foodtales/config.json`. The
//! `FOODTALES_BASE_URL` environment variable overrides the stored base URL.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::auth::DEFAULT_SERVICE_NAME;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "foodtales";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding `base_url`
pub const BASE_URL_ENV: &str = "FOODTALES_BASE_URL";

/// Production backend
pub const DEFAULT_BASE_URL: &str = "http://18.205.56.44:8080";

/// HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub keyring_service: String,
    pub request_timeout_secs: u64,
    /// Sign out when the backend rejects the session token with HTTP 401.
    pub clear_session_on_unauthorized: bool,
    pub last_email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            keyring_service: DEFAULT_SERVICE_NAME.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            clear_session_on_unauthorized: true,
            last_email: None,
        }
    }
}

impl Config {
    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides(std::env::var(BASE_URL_ENV).ok());
        Ok(config)
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self, base_url: Option<String>) {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
    }

    /// Base URL without a trailing slash, ready for path joins.
    pub fn api_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.clear_session_on_unauthorized);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            last_email: Some("a@b.com".to_string()),
            request_timeout_secs: 5,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"base_url":"http://localhost:8080/"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_base(), "http://localhost:8080");
        assert_eq!(config.keyring_service, DEFAULT_SERVICE_NAME);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_env_overrides(Some("http://staging:9000".to_string()));
        assert_eq!(config.base_url, "http://staging:9000");

        config.apply_env_overrides(Some("  ".to_string()));
        assert_eq!(config.base_url, "http://staging:9000");

        config.apply_env_overrides(None);
        assert_eq!(config.base_url, "http://staging:9000");
    }
}
