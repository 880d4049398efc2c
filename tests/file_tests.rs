//! Integration tests for file I/O operations.

mod common;

use common::{json, sample_tree};
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use treequill::config::Config;
use treequill::document::node::Value;
use treequill::file::loader::{decode_bytes, load_file};
use treequill::file::saver::{save_file, serialize};
use treequill::file::Format;

#[test]
fn test_load_json_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    fs::write(&path, r#"{"user": {"name": "Alice", "roles": ["admin"]}}"#).unwrap();

    let tree = load_file(&path).unwrap();
    assert_eq!(
        treequill::get_path(&tree, "user.roles.0", Value::Null, None).unwrap(),
        Value::from("admin")
    );
}

#[test]
fn test_load_yaml_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.yml");
    fs::write(&path, "user:\n  name: Alice\n  age: 30\n").unwrap();

    let tree = load_file(&path).unwrap();
    assert_eq!(Value::Map(tree), json(r#"{"user": {"name": "Alice", "age": 30}}"#));
}

#[test]
fn test_load_unknown_extension_sniffs_format() {
    let mut json_file = NamedTempFile::new().unwrap();
    write!(json_file, r#"[1, 2]"#).unwrap();
    assert_eq!(Value::Map(load_file(json_file.path()).unwrap()), json("[1, 2]"));

    let mut yaml_file = NamedTempFile::new().unwrap();
    write!(yaml_file, "- a\n- b\n").unwrap();
    assert_eq!(Value::Map(load_file(yaml_file.path()).unwrap()), json(r#"["a", "b"]"#));
}

#[test]
fn test_load_invalid_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "{not json").unwrap();
    assert!(load_file(&path).is_err());

    assert!(load_file(temp_dir.path().join("missing.json")).is_err());
}

#[test]
fn test_save_and_reload_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.json");
    let tree = sample_tree();

    save_file(&path, &tree, &Config::default()).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("{\n  \"foo\": \"bar\""));
    assert!(written.ends_with('\n'));
    assert_eq!(load_file(&path).unwrap(), tree);
}

#[test]
fn test_save_and_reload_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.yaml");
    let tree = sample_tree();

    save_file(&path, &tree, &Config::default()).unwrap();
    assert_eq!(load_file(&path).unwrap(), tree);
}

#[test]
fn test_save_uses_configured_format_for_unknown_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.data");
    let config = Config {
        output_format: "yaml".to_string(),
        ..Config::default()
    };

    save_file(&path, &common::tree(r#"{"a": 1}"#), &config).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "a: 1\n");
}

#[test]
fn test_gzip_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.json.gz");
    let tree = sample_tree();

    save_file(&path, &tree, &Config::default()).unwrap();

    let raw = fs::read(&path).unwrap();
    assert_eq!(&raw[..2], &[0x1f, 0x8b]);
    assert_eq!(load_file(&path).unwrap(), tree);

    // Compressed stdin input is recognized by its magic bytes
    let text = decode_bytes(raw).unwrap();
    assert!(text.contains("\"rumpel\""));
}

#[test]
fn test_backup_created_when_configured() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    fs::write(&path, r#"{"old": true}"#).unwrap();

    let config = Config {
        create_backup: true,
        ..Config::default()
    };
    save_file(&path, &common::tree(r#"{"new": true}"#), &config).unwrap();

    let backup = temp_dir.path().join("data.json.bak");
    assert_eq!(fs::read_to_string(backup).unwrap(), r#"{"old": true}"#);
    assert!(fs::read_to_string(&path).unwrap().contains("\"new\""));
}

#[test]
fn test_no_backup_by_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    fs::write(&path, "{}").unwrap();

    save_file(&path, &common::tree(r#"{"a": 1}"#), &Config::default()).unwrap();
    assert!(!temp_dir.path().join("data.json.bak").exists());
}

#[test]
fn test_serialize_formats() {
    let tree = common::tree(r#"{"list": [1, 2], "empty": {}}"#);
    assert_eq!(
        serialize(&tree, Format::Json, None).unwrap(),
        r#"{"list":[1,2],"empty":[]}"#
    );
    assert_eq!(
        serialize(&tree, Format::Yaml, None).unwrap(),
        "list:\n- 1\n- 2\nempty: []\n"
    );
}
