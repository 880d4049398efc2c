//! Conversion between trees and serialized formats.
//!
//! JSON and YAML documents are read through `serde_json` and `serde_yaml`;
//! both must have a container at the root. Delimited string lists (`a,b,c`)
//! are split by hand since they are not a serde format.
//!
//! # Example
//!
//! ```
//! use treequill::document::parser::{from_json_str, to_json_string};
//!
//! let tree = from_json_str(r#"{"name": "Alice", "tags": ["a", "b"]}"#).unwrap();
//! assert_eq!(tree.len(), 2);
//!
//! let json = to_json_string(&tree, false).unwrap();
//! assert_eq!(json, r#"{"name":"Alice","tags":["a","b"]}"#);
//! ```

use super::node::{sequence, Key, Map, Value};
use super::tree::is_sequential;
use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

/// Parses a JSON document into a tree.
pub fn from_json_str(json_str: &str) -> Result<Map> {
    let value: JsonValue = serde_json::from_str(json_str).context("Failed to parse JSON")?;
    from_json_value(&value)
}

/// Converts a JSON object or array into a tree.
pub fn from_json_value(value: &JsonValue) -> Result<Map> {
    match value_from_json(value) {
        Value::Map(map) => Ok(map),
        other => bail!("Expected a JSON object or array at the root, found {}", other),
    }
}

/// Converts any JSON value into a tree value.
pub fn value_from_json(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or_default()),
        },
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::Map(sequence(items.iter().map(value_from_json))),
        JsonValue::Object(fields) => Value::Map(
            fields
                .iter()
                .map(|(k, v)| (Key::from(k.as_str()), value_from_json(v)))
                .collect(),
        ),
    }
}

/// Parses a YAML document into a tree.
///
/// Mapping keys are converted to strings first (`true`, `1.5`) and then
/// normalized like every other key.
pub fn from_yaml_str(yaml_str: &str) -> Result<Map> {
    let value: YamlValue = serde_yaml::from_str(yaml_str).context("Failed to parse YAML")?;
    match convert_yaml(&value)? {
        Value::Map(map) => Ok(map),
        other => bail!("Expected a YAML mapping or sequence at the root, found {}", other),
    }
}

fn convert_yaml(value: &YamlValue) -> Result<Value> {
    Ok(match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or_default()),
        },
        YamlValue::String(s) => Value::String(s.clone()),
        YamlValue::Sequence(items) => Value::Map(sequence(
            items.iter().map(convert_yaml).collect::<Result<Vec<_>>>()?,
        )),
        YamlValue::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (k, v) in mapping {
                map.insert(yaml_key(k)?, convert_yaml(v)?);
            }
            Value::Map(map)
        }
        YamlValue::Tagged(tagged) => convert_yaml(&tagged.value)?,
    })
}

fn yaml_key(key: &YamlValue) -> Result<Key> {
    match key {
        YamlValue::String(s) => Ok(Key::from(s.as_str())),
        YamlValue::Number(n) => Ok(match n.as_i64() {
            Some(i) => Key::Index(i),
            None => Key::from(n.to_string()),
        }),
        YamlValue::Bool(b) => Ok(Key::from(b.to_string())),
        YamlValue::Null => Ok(Key::from("")),
        YamlValue::Tagged(tagged) => yaml_key(&tagged.value),
        _ => Err(anyhow!("Unsupported YAML mapping key: {:?}", key)),
    }
}

/// Converts a tree into a JSON value.
///
/// Sequential maps become arrays, every other map an object with
/// stringified keys. Non-finite floats and the unset marker become `null`.
pub fn to_json_value(map: &Map) -> JsonValue {
    if is_sequential(map) {
        JsonValue::Array(map.values().map(value_to_json).collect())
    } else {
        JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.to_string(), value_to_json(v)))
                .collect(),
        )
    }
}

/// Converts a single value into a JSON value.
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null | Value::Unset => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::from(*i),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Map(map) => to_json_value(map),
    }
}

/// Serializes a tree as JSON.
pub fn to_json_string(map: &Map, pretty: bool) -> Result<String> {
    let value = to_json_value(map);
    let out = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    out.context("Failed to serialize JSON")
}

/// Serializes a tree as YAML.
pub fn to_yaml_string(map: &Map) -> Result<String> {
    serde_yaml::to_string(&to_json_value(map)).context("Failed to serialize YAML")
}

/// Options for [`from_string_list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringListOptions {
    /// Splits the items; a backslash in front of it keeps it literal
    pub separator: String,
    /// Converts `null`, `true`, `false` and numbers into typed values
    pub convert_types: bool,
}

impl Default for StringListOptions {
    fn default() -> Self {
        Self {
            separator: ",".to_string(),
            convert_types: true,
        }
    }
}

/// Splits a delimited string into trimmed, non-empty items.
///
/// A separator preceded by a backslash does not split; the backslash is
/// dropped from the item.
///
/// # Example
///
/// ```
/// use treequill::document::parser::split_string_list;
///
/// assert_eq!(split_string_list(" a, b\\,c ,,d", ","), vec!["a", "b,c", "d"]);
/// ```
pub fn split_string_list(input: &str, separator: &str) -> Vec<String> {
    let input = input.trim();
    if separator.is_empty() {
        return if input.is_empty() {
            Vec::new()
        } else {
            vec![input.to_string()]
        };
    }

    let escaped = format!("\\{}", separator);
    let mut items = Vec::new();
    let mut current = String::new();
    let mut rest = input;

    while !rest.is_empty() {
        if rest.starts_with(&escaped) {
            current.push_str(separator);
            rest = &rest[escaped.len()..];
        } else if rest.starts_with(separator) {
            items.push(std::mem::take(&mut current));
            rest = &rest[separator.len()..];
        } else if let Some(ch) = rest.chars().next() {
            current.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }
    items.push(current);

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Converts a delimited string into a sequence.
pub fn from_string_list(input: &str, options: &StringListOptions) -> Map {
    sequence(
        split_string_list(input, &options.separator)
            .into_iter()
            .map(|item| {
                if options.convert_types {
                    convert_type(&item)
                } else {
                    Value::String(item)
                }
            }),
    )
}

fn convert_type(item: &str) -> Value {
    match item.to_lowercase().as_str() {
        "null" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(i) = item.parse::<i64>() {
        return Value::Int(i);
    }
    match item.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::Float(f),
        _ => Value::String(item.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_normalizes_keys() {
        let tree = from_json_str(r#"{"1": "a", "b": [true, null, 1.5]}"#).unwrap();
        assert_eq!(tree.get(&Key::Index(1)), Some(&Value::from("a")));
        let b = tree.get(&Key::from("b")).and_then(Value::as_map).unwrap();
        assert_eq!(b.get(&Key::Index(2)), Some(&Value::Float(1.5)));
    }

    #[test]
    fn test_from_json_rejects_scalar_root() {
        assert!(from_json_str("42").is_err());
        assert!(from_json_str("{invalid").is_err());
    }

    #[test]
    fn test_from_yaml() {
        let tree = from_yaml_str("foo:\n  bar: 1\n2: two\nlist:\n  - x\n").unwrap();
        assert_eq!(tree.get(&Key::Index(2)), Some(&Value::from("two")));
        let list = tree.get(&Key::from("list")).and_then(Value::as_map).unwrap();
        assert_eq!(list.get(&Key::Index(0)), Some(&Value::from("x")));
    }

    #[test]
    fn test_to_json_keeps_non_sequential_keys() {
        let mut map = Map::new();
        map.insert(Key::Index(1), Value::from("a"));
        assert_eq!(to_json_string(&map, false).unwrap(), r#"{"1":"a"}"#);
        assert_eq!(to_json_string(&Map::new(), false).unwrap(), "[]");
    }

    #[test]
    fn test_to_yaml() {
        let tree = from_json_str(r#"{"a": {"b": [1, 2]}}"#).unwrap();
        let yaml = to_yaml_string(&tree).unwrap();
        assert_eq!(from_yaml_str(&yaml).unwrap(), tree);
    }

    #[test]
    fn test_string_list_converts_types() {
        let list = from_string_list(
            "null, TRUE, false, 12, 1.5, text",
            &StringListOptions::default(),
        );
        assert_eq!(
            list.values().cloned().collect::<Vec<_>>(),
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Bool(false),
                Value::Int(12),
                Value::Float(1.5),
                Value::from("text"),
            ]
        );
    }

    #[test]
    fn test_string_list_without_conversion() {
        let options = StringListOptions {
            separator: "|".to_string(),
            convert_types: false,
        };
        let list = from_string_list("1 | a\\|b", &options);
        assert_eq!(list, sequence(vec!["1", "a|b"]));
    }
}
