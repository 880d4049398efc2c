//! TreeQuill - path expressions for reading and rewriting nested map trees.
//!
//! Trees are ordered maps ([`document::node::Map`]) whose values are scalars
//! or further maps; sequences are maps keyed `0..n`. The [`path`] module
//! addresses values inside them with expressions like `foo.bar`, `list.*.id`
//! or `foo.[bar,baz.qux]`.
//!
//! The functions at the crate root use a [`PathEngine`] private to the
//! current thread. Create your own engine to control its separator and cache.
//!
//! # Example
//!
//! ```
//! use treequill::document::node::{Map, Value};
//!
//! let tree = treequill::set_path(Map::new(), "user.name", "Alice", None).unwrap();
//! assert!(treequill::has_path(&tree, "user.name", None).unwrap());
//! assert_eq!(
//!     treequill::get_path(&tree, "user/name", Value::Null, Some("/")).unwrap(),
//!     Value::from("Alice")
//! );
//! ```

pub mod config;
pub mod document;
pub mod file;
pub mod path;

use std::cell::RefCell;

use document::node::{Key, Map, Value};
use path::engine::filter_parsed;
use path::{Columns, KeyColumn, ListOptions, ParsedPath, PathError, PathInput, RemoveOptions};

pub use path::PathEngine;

thread_local! {
    static DEFAULT_ENGINE: RefCell<PathEngine> = RefCell::new(PathEngine::new());
}

fn with_default_engine<R>(f: impl FnOnce(&mut PathEngine) -> R) -> R {
    DEFAULT_ENGINE.with(|engine| f(&mut engine.borrow_mut()))
}

fn effective_separator(engine: &PathEngine, separator: Option<&str>) -> String {
    separator.unwrap_or(engine.separator()).to_string()
}

/// Parses a path expression. See [`PathEngine::parse_path`].
pub fn parse_path(
    path: impl Into<PathInput>,
    separator: &str,
    allow_empty: bool,
) -> Result<ParsedPath, PathError> {
    with_default_engine(|engine| engine.parse_path(path, separator, allow_empty))
}

/// See [`PathEngine::has_path`].
///
/// `separator` overrides the default `.` for this call.
pub fn has_path(
    tree: &Map,
    path: impl Into<PathInput>,
    separator: Option<&str>,
) -> Result<bool, PathError> {
    with_default_engine(|engine| {
        let separator = effective_separator(engine, separator);
        engine.has_path_with(tree, path.into(), &separator)
    })
}

/// See [`PathEngine::get_path`].
pub fn get_path(
    tree: &Map,
    path: impl Into<PathInput>,
    default: impl Into<Value>,
    separator: Option<&str>,
) -> Result<Value, PathError> {
    with_default_engine(|engine| {
        let separator = effective_separator(engine, separator);
        engine.get_path_with(tree, path.into(), default.into(), &separator)
    })
}

/// See [`PathEngine::set_path`].
pub fn set_path(
    tree: Map,
    path: impl Into<PathInput>,
    value: impl Into<Value>,
    separator: Option<&str>,
) -> Result<Map, PathError> {
    with_default_engine(|engine| {
        let separator = effective_separator(engine, separator);
        engine.set_path_with(tree, path.into(), value.into(), &separator)
    })
}

/// See [`PathEngine::remove_path`].
pub fn remove_path(
    tree: Map,
    path: impl Into<PathInput>,
    options: &RemoveOptions,
) -> Result<Map, PathError> {
    with_default_engine(|engine| engine.remove_path(tree, path, options))
}

/// See [`PathEngine::filter_path`].
///
/// The callback runs after the default engine was released, so it may call
/// the other crate level functions itself.
pub fn filter_path<F>(
    tree: Map,
    path: impl Into<PathInput>,
    separator: Option<&str>,
    callback: F,
) -> Result<Map, PathError>
where
    F: FnMut(Value, &Key, &[Key], &Map) -> Value,
{
    let parsed = with_default_engine(|engine| {
        let separator = effective_separator(engine, separator);
        engine.parse_path(path, &separator, false)
    })?;
    Ok(filter_parsed(tree, &parsed, callback))
}

/// See [`PathEngine::get_list`].
pub fn get_list(
    rows: &Map,
    columns: impl Into<Columns>,
    key_column: impl Into<KeyColumn>,
    options: &ListOptions,
) -> Result<Map, PathError> {
    with_default_engine(|engine| engine.get_list(rows, columns, key_column, options))
}

/// See [`PathEngine::merge_paths`].
pub fn merge_paths(
    path_a: impl Into<PathInput>,
    path_b: impl Into<PathInput>,
    separator_a: Option<&str>,
    separator_b: Option<&str>,
) -> Result<ParsedPath, PathError> {
    with_default_engine(|engine| engine.merge_paths(path_a, path_b, separator_a, separator_b))
}

/// See [`PathEngine::unflatten`].
pub fn unflatten(map: &Map) -> Result<Map, PathError> {
    with_default_engine(|engine| engine.unflatten(map))
}

/// See [`PathEngine::without`].
pub fn without<I, P>(map: Map, paths: I, keep_empty: bool) -> Result<Map, PathError>
where
    I: IntoIterator<Item = P>,
    P: Into<PathInput>,
{
    with_default_engine(|engine| engine.without(map, paths, keep_empty))
}
