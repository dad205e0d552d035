use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::extract::DEFAULT_SUBMITTED_MARKER;
use crate::options::Options;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Text in the status cell that marks an assignment as submitted.
    pub submitted_marker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    /// Option values used until the store holds something else.
    pub options: Options,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            submitted_marker: DEFAULT_SUBMITTED_MARKER.to_string(),
            log_level: None,
            options: Options::default(),
        }
    }
}

impl Config {
    /// Loads `path`, or the default location when `path` is `None`. A missing
    /// file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::config_path(),
        };
        match path {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if config.submitted_marker.trim().is_empty() {
            config.submitted_marker = DEFAULT_SUBMITTED_MARKER.to_string();
        }
        Ok(config)
    }

    pub fn generate_default(path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path().with_context(|| "Could not determine config directory")?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_str = toml::to_string_pretty(&Config::default())?;
        std::fs::write(&path, toml_str)?;
        Ok(path)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("duesort").join("config.toml"))
    }
}
