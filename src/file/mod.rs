//! File I/O operations for trees.
//!
//! This module provides functionality to load JSON and YAML documents from disk
//! or stdin, and save trees back to files with atomic write operations and
//! optional backups. Files ending in `.gz` are transparently (de)compressed.

use anyhow::{bail, Result};
use std::path::Path;

pub mod loader;
pub mod saver;

/// Serialized formats a tree can be read from and written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Parses a format name as used by the config file and command line.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => bail!("Unknown format: {}", other),
        }
    }

    /// Determines the format from a file name, ignoring a `.gz` suffix.
    ///
    /// Examples:
    /// - `data.yaml` → Some(Yaml)
    /// - `data.yml.gz` → Some(Yaml)
    /// - `data.json` → Some(Json)
    /// - `data.txt` → None
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path_str = path.as_ref().to_string_lossy().to_ascii_lowercase();
        let base = path_str.strip_suffix(".gz").unwrap_or(&path_str);

        if base.ends_with(".yaml") || base.ends_with(".yml") {
            Some(Format::Yaml)
        } else if base.ends_with(".json") {
            Some(Format::Json)
        } else {
            None
        }
    }
}

/// Returns true if the file name asks for gzip compression.
pub(crate) fn is_gzipped<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false)
}
