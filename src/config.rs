//! Configuration management for caper
//!
//! Handles config file loading and API key resolution.
//! Config is stored at ~/.config/caper/config.toml

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::query::DEFAULT_TTL;

/// Environment variable that overrides the configured API key
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// TMDB API read access token
    pub tmdb_api_key: Option<String>,
    /// Response language sent to TMDB (e.g. "en-US")
    pub language: Option<String>,
    /// Seconds fetched data stays fresh
    pub cache_ttl_secs: Option<u64>,
    /// Log file for the TUI
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Get config file path (~/.config/caper/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("caper").join("config.toml"))
    }

    /// Load config from `path`, or the default location when `None`.
    /// A missing file yields the default config; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Get TMDB API key with fallback chain:
    /// 1. Environment variable TMDB_API_KEY
    /// 2. Key from config file
    pub fn api_key(&self) -> Result<String> {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    fn resolve_api_key(&self, env: Option<String>) -> Result<String> {
        env.filter(|k| !k.trim().is_empty())
            .or_else(|| self.tmdb_api_key.clone().filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No TMDB API key. Set {} or tmdb_api_key in {}",
                    API_KEY_ENV,
                    Self::path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "the config file".into())
                )
            })
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TTL)
    }

    /// Where the TUI writes its log: configured path, else the cache dir
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::cache_dir().map(|p| p.join("caper").join("caper.log")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.tmdb_api_key.is_none());
        assert_eq!(config.cache_ttl(), DEFAULT_TTL);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "tmdb_api_key = \"token\"\nlanguage = \"es-ES\"\ncache_ttl_secs = 5\n",
        )
        .unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(
            loaded,
            Config {
                tmdb_api_key: Some("token".into()),
                language: Some("es-ES".into()),
                cache_ttl_secs: Some(5),
                log_file: None,
            }
        );
        assert_eq!(loaded.cache_ttl(), Duration::from_secs(5));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "cache_ttl_secs = \"soon\"").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_api_key_precedence() {
        let config = Config {
            tmdb_api_key: Some("from-file".into()),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_api_key(Some("from-env".into())).unwrap(),
            "from-env"
        );
        assert_eq!(config.resolve_api_key(None).unwrap(), "from-file");
        assert_eq!(config.resolve_api_key(Some("  ".into())).unwrap(), "from-file");
    }

    #[test]
    fn test_missing_api_key_is_error() {
        let err = Config::default().resolve_api_key(None).unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV));
    }
}
