//! Display configuration (display.toml)

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlatformError, Result};
use crate::surface::{RenderingDriver, VSyncMode};

/// Display server settings read at startup
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Keep the screen on while the app is in the foreground
    #[serde(default = "default_true")]
    pub keep_screen_on: bool,
    /// Graphics driver used to create the surface
    #[serde(default)]
    pub rendering_driver: RenderingDriver,
    /// Initial vsync mode of the main window
    #[serde(default)]
    pub vsync_mode: VSyncMode,
    /// `tracing` filter directive (e.g. `"info"` or `"lumen_platform_android=debug"`)
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_true() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            keep_screen_on: default_true(),
            rendering_driver: RenderingDriver::default(),
            vsync_mode: VSyncMode::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl DisplayConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PlatformError::Config(e.to_string()))
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PlatformError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded display config from {}", path.display());
        Ok(config)
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PlatformError::Config(e.to_string()))
    }
}
