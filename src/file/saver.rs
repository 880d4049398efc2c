//! Tree saving functionality.
//!
//! This module provides functions to serialize trees and save them to files
//! with atomic write operations and optional backup creation.

use super::{is_gzipped, Format};
use crate::config::Config;
use crate::document::node::Map;
use crate::document::parser::{to_json_string, to_json_value, to_yaml_string};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Serializes a tree in the given format.
///
/// JSON is pretty printed with `indent_size` spaces, or printed on a single
/// line when `indent_size` is `None`. YAML ignores the indentation.
pub fn serialize(tree: &Map, format: Format, indent_size: Option<usize>) -> Result<String> {
    match format {
        Format::Yaml => to_yaml_string(tree),
        Format::Json => match indent_size {
            None => to_json_string(tree, false),
            Some(indent) => to_json_string_indented(tree, indent),
        },
    }
}

fn to_json_string_indented(tree: &Map, indent_size: usize) -> Result<String> {
    let indent = " ".repeat(indent_size);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    to_json_value(tree)
        .serialize(&mut serializer)
        .context("Failed to serialize JSON")?;
    String::from_utf8(out).context("Serialized JSON is not UTF-8")
}

/// Creates a backup of a file by copying it with a .bak extension.
fn create_backup<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let mut backup_path = path.to_path_buf();
    let original_name = backup_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    backup_path.set_file_name(format!("{}.bak", original_name));
    fs::copy(path, backup_path).context("Failed to create backup")?;
    Ok(())
}

/// Saves a tree to a file with optional backup creation.
///
/// The format follows the file extension, falling back to
/// `config.output_format`. The write is atomic (temp file then rename) and
/// gzip compressed when the target ends in `.gz`.
///
/// # Examples
///
/// ```no_run
/// use treequill::config::Config;
/// use treequill::document::node::Map;
/// use treequill::file::saver::save_file;
///
/// save_file("output.json", &Map::new(), &Config::default()).unwrap();
/// ```
pub fn save_file<P: AsRef<Path>>(path: P, tree: &Map, config: &Config) -> Result<()> {
    let path = path.as_ref();

    let format = match Format::from_path(path) {
        Some(format) => format,
        None => Format::from_name(&config.output_format)?,
    };

    // Create backup if requested and file exists
    if config.create_backup && path.exists() {
        create_backup(path)?;
    }

    let mut out = serialize(tree, format, Some(config.indent_size))?;
    if !out.ends_with('\n') {
        out.push('\n');
    }

    write_file_atomic(path, out.as_bytes(), is_gzipped(path))
}

/// Writes data to a file atomically, optionally compressing with gzip.
fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    if compress {
        let file = fs::File::create(&temp_path).context("Failed to create temp file")?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        fs::write(&temp_path, data).context("Failed to write temp file")?;
    }

    // Atomic rename
    fs::rename(&temp_path, path).context("Failed to rename temp file")?;

    Ok(())
}
