//! Configuration system for treequill.
//!
//! This module provides the configuration structure for treequill with sensible
//! defaults and support for serialization/deserialization via serde. Configuration
//! is loaded from a TOML file and merged with command-line arguments.
//!
//! # Example
//!
//! ```
//! use treequill::config::Config;
//!
//! // Use default configuration
//! let config = Config::default();
//! assert_eq!(config.separator, ".");
//! assert_eq!(config.cache_capacity, 20);
//!
//! // Create custom configuration
//! let custom = Config {
//!     separator: "/".to_string(),
//!     keep_empty: true,
//!     ..Config::default()
//! };
//! ```

use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the treequill library defaults and command line tool.
///
/// # Fields
///
/// * `separator` - Separator between path segments (default: ".")
/// * `cache_capacity` - Number of parsed paths kept per engine (default: 20)
/// * `keep_empty` - Keep maps emptied by a removal (default: false)
/// * `indent_size` - Number of spaces per indentation level of pretty JSON (default: 2)
/// * `output_format` - Output format when none is given: "json" or "yaml" (default: "json")
/// * `create_backup` - Create .bak files before saving in place (default: false)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Separator between path segments
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Number of parsed paths kept per engine
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Keep maps emptied by a removal
    #[serde(default)]
    pub keep_empty: bool,

    /// Number of spaces per indentation level
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Output format: "json" or "yaml"
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Create .bak files before saving
    #[serde(default)]
    pub create_backup: bool,
}

fn default_separator() -> String {
    crate::path::DEFAULT_SEPARATOR.to_string()
}

fn default_cache_capacity() -> usize {
    crate::path::DEFAULT_CACHE_CAPACITY
}

/// Returns the default indentation size.
fn default_indent_size() -> usize {
    2
}

fn default_output_format() -> String {
    "json".to_string()
}

impl Default for Config {
    /// Creates a new configuration with default values.
    ///
    /// # Example
    ///
    /// ```
    /// use treequill::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.output_format, "json");
    /// assert!(!config.keep_empty);
    /// ```
    fn default() -> Self {
        Self {
            separator: default_separator(),
            cache_capacity: default_cache_capacity(),
            keep_empty: false,
            indent_size: default_indent_size(),
            output_format: default_output_format(),
            create_backup: false,
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/treequill/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("treequill");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to the defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                warn!("ignoring invalid config {}: {}", path.display(), err);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }
}
