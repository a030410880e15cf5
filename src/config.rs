//! Configuration persistence for inatator settings

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::session::viewport::DEFAULT_MIN_GRID_ZOOM;

/// Environment variable overriding the backend URL
pub const API_URL_ENV: &str = "INATATOR_API_URL";

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the prediction/annotation backend
    pub api_base_url: String,
    /// Grid resolution for annotation and prediction cells (0-15)
    pub hexagon_resolution: u8,
    /// Zoom level at or below which the grid is hidden
    pub min_grid_zoom: u8,
    /// Request timeout for backend calls, in seconds
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            hexagon_resolution: 5,
            min_grid_zoom: DEFAULT_MIN_GRID_ZOOM,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Application directory name under the user config dir
    pub const APP_DIR: &'static str = "inatator";

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::APP_DIR).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    ///
    /// The backend URL can be overridden from the environment.
    pub fn load() -> Self {
        let config = match Self::default_path() {
            Some(path) if path.exists() => match Self::load_from(&path) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!("Error loading config, using defaults: {:?}", err);
                    Self::default()
                }
            },
            Some(_) => Self::default(),
            None => {
                log::warn!("Could not determine config directory, using defaults");
                Self::default()
            }
        };

        config.with_env_override(std::env::var(API_URL_ENV).ok())
    }

    /// Apply the value of [`API_URL_ENV`], if set and non-empty
    pub fn with_env_override(mut self, api_url: Option<String>) -> Self {
        match api_url {
            Some(url) if !url.trim().is_empty() => {
                log::debug!("Backend URL overridden from {API_URL_ENV}: {url}");
                self.api_base_url = url;
            }
            _ => {}
        }
        self
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::default_path() else {
            log::error!("Could not determine config directory for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    /// Read a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write a config file, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Configured grid resolution
    pub fn resolution(&self) -> crate::Result<h3o::Resolution> {
        crate::grid::resolution(self.hexagon_resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.hexagon_resolution, 5);
        assert_eq!(config.min_grid_zoom, 7);
        assert_eq!(config.resolution().unwrap(), h3o::Resolution::Five);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            api_base_url: "https://example.org/api".to_string(),
            request_timeout_secs: 5,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"min_grid_zoom": 9}"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.min_grid_zoom, 9);
        assert_eq!(config.hexagon_resolution, 5);
    }

    #[test]
    fn test_env_override_replaces_backend_url() {
        let config = Config::default().with_env_override(Some("http://backend:9000".to_string()));
        assert_eq!(config.api_base_url, "http://backend:9000");
        assert_eq!(config.hexagon_resolution, 5);
    }

    #[test]
    fn test_unset_or_blank_env_keeps_file_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_base_url": "https://saved.example"}"#).unwrap();
        let saved = Config::load_from(&path).unwrap();

        assert_eq!(
            saved.clone().with_env_override(None).api_base_url,
            "https://saved.example"
        );
        assert_eq!(
            saved.with_env_override(Some("  ".to_string())).api_base_url,
            "https://saved.example"
        );
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
