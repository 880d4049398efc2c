//! Row projection over lists of maps.
//!
//! [`PathEngine::get_list`](super::PathEngine::get_list) extracts columns from
//! every row of a list, optionally keyed by another column:
//!
//! ```
//! use treequill::document::parser::from_json_str;
//! use treequill::path::{ListOptions, PathEngine};
//!
//! let rows = from_json_str(r#"[
//!     {"id": "234", "title": "medium"},
//!     {"id": "123", "title": "apple"}
//! ]"#).unwrap();
//!
//! let mut engine = PathEngine::new();
//! let list = engine.get_list(&rows, "title", "id", &ListOptions::default()).unwrap();
//! // {"234": "medium", "123": "apple"}
//! assert_eq!(list.len(), 2);
//! ```

use log::debug;

use crate::document::node::{push, Key, Map, Value};
use crate::document::parser::split_string_list;

use super::ast::PathInput;
use super::engine::PathEngine;
use super::error::PathError;

/// Splits a column specifier into its path and its alias.
pub const ALIAS_SEPARATOR: &str = " as ";

/// The columns to extract from each row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Columns {
    /// Every column, rows are kept as they are
    All,
    /// Column specifiers like `id`, `array.id` or `array.rumpel as alias`
    List(Vec<String>),
}

impl Columns {
    /// An empty list or one starting with `*` selects all columns.
    fn normalized(self) -> Self {
        match self {
            Columns::List(list) if list.is_empty() || list[0] == "*" => Columns::All,
            other => other,
        }
    }
}

impl From<&str> for Columns {
    /// Parses a comma separated list of specifiers.
    fn from(list: &str) -> Self {
        Columns::List(split_string_list(list, ","))
    }
}

impl From<String> for Columns {
    fn from(list: String) -> Self {
        Columns::from(list.as_str())
    }
}

impl From<Vec<&str>> for Columns {
    fn from(list: Vec<&str>) -> Self {
        Columns::List(list.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Columns {
    fn from(list: Vec<String>) -> Self {
        Columns::List(list)
    }
}

/// What the rows of the result are keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeyColumn {
    /// Rows are numbered sequentially
    #[default]
    None,
    /// Rows are keyed by the value at this column or path
    Column(String),
    /// Rows keep the key they had in the input
    PreserveRowKey,
}

impl From<&str> for KeyColumn {
    fn from(column: &str) -> Self {
        if column.is_empty() {
            KeyColumn::None
        } else {
            KeyColumn::Column(column.to_string())
        }
    }
}

impl From<String> for KeyColumn {
    fn from(column: String) -> Self {
        KeyColumn::from(column.as_str())
    }
}

impl From<Option<&str>> for KeyColumn {
    fn from(column: Option<&str>) -> Self {
        column.map(KeyColumn::from).unwrap_or_default()
    }
}

impl From<bool> for KeyColumn {
    /// `true` keeps the original row keys.
    fn from(preserve: bool) -> Self {
        if preserve {
            KeyColumn::PreserveRowKey
        } else {
            KeyColumn::None
        }
    }
}

/// Options for [`PathEngine::get_list`](super::PathEngine::get_list).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListOptions {
    /// Value used for columns missing in a row
    pub default: Value,
    /// Overrides the engine's separator
    pub separator: Option<String>,
}

/// A parsed column specifier.
#[derive(Debug, Clone)]
struct ColumnDef {
    key: String,
    alias: String,
    is_path: bool,
}

fn column_def(
    engine: &mut PathEngine,
    spec: &str,
    separator: &str,
) -> Result<ColumnDef, PathError> {
    let (key, alias) = match spec.rfind(ALIAS_SEPARATOR) {
        Some(at) => (&spec[..at], &spec[at + ALIAS_SEPARATOR.len()..]),
        None => (spec, spec),
    };
    let is_path =
        key.contains(separator) && engine.parse_path(key, separator, true)?.len() > 1;

    Ok(ColumnDef {
        key: key.to_string(),
        alias: alias.to_string(),
        is_path,
    })
}

/// Places a row under `key`, or under the next free index when it has none.
fn place(result: &mut Map, key: Option<Key>, row: Value) {
    match key {
        Some(key) => {
            result.insert(key, row);
        }
        None => {
            push(result, row);
        }
    }
}

pub(crate) fn get_list(
    engine: &mut PathEngine,
    rows: &Map,
    columns: Columns,
    key_column: &KeyColumn,
    options: &ListOptions,
) -> Result<Map, PathError> {
    let separator = options
        .separator
        .clone()
        .unwrap_or_else(|| engine.separator().to_string());
    let mut result = Map::new();

    if rows.is_empty() {
        return Ok(result);
    }

    let specs = match columns.normalized() {
        Columns::List(specs) => specs,
        Columns::All => {
            let key = match key_column {
                KeyColumn::Column(key) => key,
                KeyColumn::None | KeyColumn::PreserveRowKey => return Ok(rows.clone()),
            };
            for row in rows.values() {
                let row_map = match row {
                    Value::Map(row_map) => row_map,
                    _ => {
                        debug!("get_list skipped a row that is not a map");
                        continue;
                    }
                };
                let fallback = Value::Int(result.len() as i64);
                let row_key = engine.get_path_with(
                    row_map,
                    PathInput::Text(key.clone()),
                    fallback,
                    &separator,
                )?;
                place(&mut result, row_key.to_key(), row.clone());
            }
            return Ok(result);
        }
    };

    let single_column = specs.len() == 1;
    let mut defs = specs
        .iter()
        .map(|spec| column_def(engine, spec, &separator))
        .collect::<Result<Vec<_>, _>>()?;

    // The key column is resolved first and left out of the row output
    let mut key_injected = false;
    if let KeyColumn::Column(key) = key_column {
        if !defs.iter().any(|def| &def.key == key) {
            defs.insert(0, column_def(engine, key, &separator)?);
            key_injected = true;
        }
    }

    for (row_key, row) in rows {
        let row = match row {
            Value::Map(row) => row,
            _ => {
                debug!("get_list skipped row {} that is not a map", row_key);
                continue;
            }
        };

        let mut row_result = Map::new();
        let mut bare_value = None;
        let mut resolved_key = None;

        for def in &defs {
            let value = if def.is_path {
                engine.get_path_with(
                    row,
                    PathInput::Text(def.key.clone()),
                    options.default.clone(),
                    &separator,
                )?
            } else {
                row.get(&Key::from(def.key.as_str()))
                    .cloned()
                    .unwrap_or_else(|| options.default.clone())
            };

            if let KeyColumn::Column(key) = key_column {
                if &def.alias == key {
                    resolved_key = Some(value.clone());
                    if key_injected {
                        continue;
                    }
                }
            }

            // An alias always forces a map, otherwise it would be pointless
            if single_column && def.key == def.alias {
                bare_value = Some(value);
                break;
            }

            row_result.insert(Key::from(def.alias.as_str()), value);
        }

        let output = bare_value.unwrap_or(Value::Map(row_result));
        match key_column {
            KeyColumn::PreserveRowKey => {
                result.insert(row_key.clone(), output);
            }
            _ => place(&mut result, resolved_key.and_then(|v| v.to_key()), output),
        }
    }

    Ok(result)
}
