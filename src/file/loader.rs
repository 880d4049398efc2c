//! Tree loading functionality.
//!
//! This module provides functions to load JSON and YAML documents from files
//! or stdin, converting them into trees the path engine works on.

use super::{is_gzipped, Format};
use crate::document::node::Map;
use crate::document::parser::{from_json_str, from_yaml_str};
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Loads and parses a JSON or YAML file from the filesystem.
///
/// The format is taken from the file extension (`.json`, `.yaml`, `.yml`,
/// each optionally followed by `.gz`). Files with another extension are
/// parsed like stdin: JSON first, then YAML.
///
/// # Examples
///
/// ```no_run
/// use treequill::file::loader::load_file;
///
/// let tree = load_file("config.yaml").unwrap();
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file path does not exist or cannot be read
/// - A `.gz` file is not valid gzip
/// - The contents are not a valid document with a map or sequence at the root
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Map> {
    let path_ref = path.as_ref();

    // Read content (decompress if needed)
    let content = if is_gzipped(path_ref) {
        read_gzipped_file(path_ref)?
    } else {
        fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read file: {}", path_ref.display()))?
    };

    match Format::from_path(path_ref) {
        Some(Format::Json) => from_json_str(&content),
        Some(Format::Yaml) => from_yaml_str(&content),
        None => parse_content(&content),
    }
}

/// Parses content of unknown format, trying JSON first and then YAML.
pub fn parse_content(content: &str) -> Result<Map> {
    match from_json_str(content) {
        Ok(tree) => Ok(tree),
        Err(err) => {
            debug!("input is not JSON ({:#}), trying YAML", err);
            from_yaml_str(content).context("Input is neither valid JSON nor valid YAML")
        }
    }
}

/// Loads and parses a document from standard input.
///
/// Gzip compressed input is detected by its magic bytes.
///
/// # Examples
///
/// ```no_run
/// use treequill::file::loader::load_from_stdin;
///
/// // Usage: echo '{"key": "value"}' | treequill get key
/// let tree = load_from_stdin().unwrap();
/// ```
pub fn load_from_stdin() -> Result<Map> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    parse_content(&decode_bytes(buffer)?)
}

/// Converts raw input into text, decompressing gzip data.
pub fn decode_bytes(buffer: Vec<u8>) -> Result<String> {
    // Check for gzip magic bytes (0x1f 0x8b)
    if buffer.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(&buffer)
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in input")
    }
}

/// Reads and decompresses a gzipped file.
fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped input")?;
    Ok(content)
}
