//! Configuration module for nodeport-rs
//!
//! The engine is stateless; the only tunables are the layout constants
//! used by the geometry engine. They live in a small TOML file:
//!
//! ```toml
//! [layout]
//! port_diameter = 14.0
//! upper_bound = 0.9
//! ```
//!
//! Missing keys take their defaults, so an empty file is a valid config.
//!
//! # Config Location
//!
//! [`EngineConfig::load_or_default`] reads `nodeport.toml` from the
//! platform-appropriate config directory under `dev.hxyulin.nodeport-rs`:
//! - **Linux**: `~/.config/dev.hxyulin.nodeport-rs/`
//! - **macOS**: `~/Library/Application Support/dev.hxyulin.nodeport-rs/`
//! - **Windows**: `%APPDATA%\dev.hxyulin.nodeport-rs\`

pub mod settings;

pub use settings::*;

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "dev.hxyulin.nodeport-rs";

/// Config filename
pub const CONFIG_FILE: &str = "nodeport.toml";

/// Get the default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID).join(CONFIG_FILE))
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Geometry engine constants
    pub layout: LayoutSettings,
}

impl EngineConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config.sanitized())
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from the default location, returning defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = default_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save the config as TOML, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    EngineError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| EngineError::Config(format!("Failed to write config: {}", e)))
    }

    /// Config with out-of-range layout values replaced by defaults
    pub fn sanitized(self) -> Self {
        Self {
            layout: self.layout.sanitized(),
        }
    }
}

// ==================== Tests ====================
