//! Client configuration.
//!
//! Loaded from `config.toml` in the platform config directory
//! (`~/.config/aquaview` on Linux), then overridden by environment
//! variables. Every field has a default so a fresh install works against
//! a local backend with no file present.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default backend origin for local development.
const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Fixed request timeout in seconds. Not configurable per call.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Top-level client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend origin, e.g. `https://water.example.org`.
    pub api_url: String,
    /// Directory holding the persisted credential slot. Defaults to the
    /// platform config directory.
    pub storage_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_dir: None,
        }
    }
}

impl Config {
    /// Load configuration: file (if present) then environment overrides.
    pub fn load(path_override: Option<&Path>) -> Result<Self> {
        let path = match path_override {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_config_path(),
        };

        let mut config = match path {
            Some(ref p) if p.exists() => {
                let raw = std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config file {}", p.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("Invalid config file {}", p.display()))?
            }
            _ => Self::default(),
        };

        if let Ok(url) = std::env::var("AQUAVIEW_API_URL") {
            if !url.is_empty() {
                config.api_url = url;
            }
        }
        if let Ok(dir) = std::env::var("AQUAVIEW_STORAGE_DIR") {
            if !dir.is_empty() {
                config.storage_dir = Some(PathBuf::from(dir));
            }
        }

        // A trailing slash would produce double-slash paths when joined.
        while config.api_url.ends_with('/') {
            config.api_url.pop();
        }

        Ok(config)
    }

    /// Directory where the credential slot lives.
    pub fn storage_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage_dir {
            return dir.clone();
        }
        Self::project_dir().unwrap_or_else(|| PathBuf::from(".aquaview"))
    }

    /// `config.toml` location inside the platform config directory.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dir().map(|d| d.join("config.toml"))
    }

    fn project_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "aquaview", "aquaview")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }
}
