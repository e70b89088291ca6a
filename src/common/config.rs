//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::paths::config_path;
use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Rendering backend settings
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Hover simulation settings
    #[serde(default)]
    pub hover: HoverConfig,
}

/// Which renderer to use and how to start it
#[derive(Debug, Deserialize)]
pub struct RendererConfig {
    /// Render bridge executable (absolute path or name on PATH)
    #[serde(default = "default_bridge")]
    pub command: PathBuf,

    /// Additional arguments to pass to the bridge
    #[serde(default)]
    pub args: Vec<String>,

    /// Pre-computed render snapshot, relative to the exercise root.
    /// When set, no bridge process is started.
    #[serde(default)]
    pub snapshot: Option<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: default_bridge(),
            args: Vec::new(),
            snapshot: None,
        }
    }
}

fn default_bridge() -> PathBuf {
    PathBuf::from("style-render-bridge")
}

/// Timeout settings in seconds
#[derive(Debug, Deserialize)]
pub struct Timeouts {
    /// Timeout for starting the bridge and loading the document
    #[serde(default = "default_renderer_start")]
    pub renderer_start_secs: u64,

    /// Timeout for any other render request
    #[serde(default = "default_request")]
    pub request_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            renderer_start_secs: default_renderer_start(),
            request_secs: default_request(),
        }
    }
}

fn default_renderer_start() -> u64 {
    15
}
fn default_request() -> u64 {
    30
}

/// Hover simulation settings
#[derive(Debug, Deserialize)]
pub struct HoverConfig {
    /// Fixed wait between hovering and re-reading styles
    #[serde(default = "default_settle")]
    pub settle_ms: u64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            settle_ms: default_settle(),
        }
    }
}

fn default_settle() -> u64 {
    200
}

impl HoverConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Resolve the bridge executable
    ///
    /// Explicit paths are used as-is, bare names are searched on PATH.
    pub fn bridge_path(&self) -> Result<PathBuf> {
        let command = &self.renderer.command;
        if command.components().count() > 1 {
            return Ok(command.clone());
        }
        which::which(command).map_err(|_| Error::RendererNotFound {
            name: command.display().to_string(),
        })
    }
}
