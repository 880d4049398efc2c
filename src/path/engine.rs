//! The public path API.

use crate::config::Config;
use crate::document::node::{Key, Map, Value};

use super::ast::{ParsedPath, PathInput};
use super::error::PathError;
use super::list::{self, Columns, KeyColumn, ListOptions};
use super::parser::{can_use_fast_lane, Parser, DEFAULT_SEPARATOR};
use super::walker;

/// Options for [`PathEngine::remove_path`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoveOptions {
    /// Overrides the engine's separator
    pub separator: Option<String>,
    /// Keep maps that became empty through the removal
    pub keep_empty: bool,
}

/// Reads and rewrites trees through path expressions.
///
/// The engine owns a parser and its cache of recently parsed paths, which is
/// why every operation takes `&mut self`. Simple keys skip the parser
/// entirely.
///
/// # Example
///
/// ```
/// use treequill::document::node::{Map, Value};
/// use treequill::path::PathEngine;
///
/// let mut engine = PathEngine::new();
/// let tree = engine.set_path(Map::new(), "foo.bar", "baz").unwrap();
///
/// assert!(engine.has_path(&tree, "foo.bar").unwrap());
/// assert_eq!(engine.get_path(&tree, "foo.bar", Value::Null).unwrap(), Value::from("baz"));
/// ```
#[derive(Debug, Clone)]
pub struct PathEngine {
    parser: Parser,
    separator: String,
}

impl Default for PathEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PathEngine {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    /// Creates an engine using the separator and cache size of `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_separator(config.separator.clone())
            .with_cache_capacity(config.cache_capacity)
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Replaces the parser, dropping everything cached so far.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.parser = Parser::with_cache_capacity(capacity);
        self
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn clear_cache(&mut self) {
        self.parser.clear_cache();
    }

    /// Parses a path expression with an explicit separator.
    pub fn parse_path(
        &mut self,
        path: impl Into<PathInput>,
        separator: &str,
        allow_empty: bool,
    ) -> Result<ParsedPath, PathError> {
        self.parser.parse(path, separator, allow_empty)
    }

    /// Returns the literal key of a path that can take the fast lane.
    fn fast_lane_key(input: &PathInput, separator: &str) -> Option<Key> {
        match input {
            PathInput::Text(raw) if can_use_fast_lane(raw, separator) => {
                Some(Key::from(raw.as_str()))
            }
            _ => None,
        }
    }

    /// Returns true if every key selected by `path` exists in `tree`.
    ///
    /// Groups require all of their members to exist.
    pub fn has_path(&mut self, tree: &Map, path: impl Into<PathInput>) -> Result<bool, PathError> {
        let separator = self.separator.clone();
        self.has_path_with(tree, path.into(), &separator)
    }

    pub(crate) fn has_path_with(
        &mut self,
        tree: &Map,
        input: PathInput,
        separator: &str,
    ) -> Result<bool, PathError> {
        if let Some(key) = Self::fast_lane_key(&input, separator) {
            return Ok(tree.contains_key(&key));
        }

        let parsed = self.parser.parse(input, separator, false)?;
        Ok(walker::has(tree, parsed.segments()).is_ok())
    }

    /// Reads the value at `path`, or `default` when it does not exist.
    ///
    /// Wildcards and groups return maps of every matched value. A wildcard
    /// over a sequence returns a sequence.
    pub fn get_path(
        &mut self,
        tree: &Map,
        path: impl Into<PathInput>,
        default: impl Into<Value>,
    ) -> Result<Value, PathError> {
        let separator = self.separator.clone();
        self.get_path_with(tree, path.into(), default.into(), &separator)
    }

    pub(crate) fn get_path_with(
        &mut self,
        tree: &Map,
        input: PathInput,
        default: Value,
        separator: &str,
    ) -> Result<Value, PathError> {
        if tree.is_empty() {
            return Ok(default);
        }

        if let Some(key) = Self::fast_lane_key(&input, separator) {
            return Ok(tree.get(&key).cloned().unwrap_or(default));
        }

        let parsed = self.parser.parse(input, separator, false)?;
        Ok(walker::get(tree, parsed.segments(), &default, false))
    }

    /// Sets `value` at `path`, creating intermediate maps as needed.
    ///
    /// Non-map values in the way are replaced by maps.
    pub fn set_path(
        &mut self,
        tree: Map,
        path: impl Into<PathInput>,
        value: impl Into<Value>,
    ) -> Result<Map, PathError> {
        let separator = self.separator.clone();
        self.set_path_with(tree, path.into(), value.into(), &separator)
    }

    pub(crate) fn set_path_with(
        &mut self,
        tree: Map,
        input: PathInput,
        value: Value,
        separator: &str,
    ) -> Result<Map, PathError> {
        let mut tree = tree;

        if let Some(key) = Self::fast_lane_key(&input, separator) {
            tree.insert(key, value);
            return Ok(tree);
        }

        let parsed = self.parser.parse(input, separator, false)?;
        walker::set(&mut tree, parsed.segments(), &value);
        Ok(tree)
    }

    /// Removes the values at `path`.
    ///
    /// Maps left empty by the removal are removed as well unless
    /// `options.keep_empty` is set.
    pub fn remove_path(
        &mut self,
        tree: Map,
        path: impl Into<PathInput>,
        options: &RemoveOptions,
    ) -> Result<Map, PathError> {
        let input = path.into();
        let separator = options
            .separator
            .clone()
            .unwrap_or_else(|| self.separator.clone());
        let mut tree = tree;

        if let Some(key) = Self::fast_lane_key(&input, &separator) {
            tree.shift_remove(&key);
            return Ok(tree);
        }

        let parsed = self.parser.parse(input, &separator, false)?;
        walker::remove(&mut tree, parsed.segments(), options.keep_empty);
        Ok(tree)
    }

    /// Replaces every existing value at `path` with the result of `callback`.
    ///
    /// The callback receives the value, its key, the keys leading to it and
    /// the tree as it was before filtering started.
    pub fn filter_path<F>(
        &mut self,
        tree: Map,
        path: impl Into<PathInput>,
        callback: F,
    ) -> Result<Map, PathError>
    where
        F: FnMut(Value, &Key, &[Key], &Map) -> Value,
    {
        let separator = self.separator.clone();
        let parsed = self.parser.parse(path, &separator, false)?;
        Ok(filter_parsed(tree, &parsed, callback))
    }

    /// Extracts columns from a list of rows.
    ///
    /// See the [`list`](super::list) module for the column syntax.
    pub fn get_list(
        &mut self,
        rows: &Map,
        columns: impl Into<Columns>,
        key_column: impl Into<KeyColumn>,
        options: &ListOptions,
    ) -> Result<Map, PathError> {
        list::get_list(self, rows, columns.into(), &key_column.into(), options)
    }

    /// Concatenates two paths.
    ///
    /// `separator_a` defaults to the engine's separator and `separator_b` to
    /// `separator_a`. Empty paths are allowed on both sides.
    pub fn merge_paths(
        &mut self,
        path_a: impl Into<PathInput>,
        path_b: impl Into<PathInput>,
        separator_a: Option<&str>,
        separator_b: Option<&str>,
    ) -> Result<ParsedPath, PathError> {
        let separator_a = separator_a.unwrap_or(self.separator.as_str()).to_string();
        let separator_b = separator_b.map(str::to_string).unwrap_or_else(|| separator_a.clone());

        let a = self.parser.parse(path_a, &separator_a, true)?;
        let b = self.parser.parse(path_b, &separator_b, true)?;
        Ok(a.concat(b))
    }

    /// Inflates a map keyed by paths into a tree.
    ///
    /// Reverse of [`flatten`](crate::document::tree::flatten).
    pub fn unflatten(&mut self, map: &Map) -> Result<Map, PathError> {
        let mut out = Map::new();
        for (key, value) in map {
            let path = match key {
                Key::Index(i) => PathInput::Number(*i),
                Key::Name(name) => PathInput::Text(name.clone()),
            };
            out = self.set_path(out, path, value.clone())?;
        }
        Ok(out)
    }

    /// Removes every path in `paths` from `map`.
    pub fn without<I, P>(&mut self, map: Map, paths: I, keep_empty: bool) -> Result<Map, PathError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathInput>,
    {
        let options = RemoveOptions {
            separator: None,
            keep_empty,
        };
        paths
            .into_iter()
            .try_fold(map, |map, path| self.remove_path(map, path, &options))
    }
}

/// Runs the filter walker over an already parsed path.
pub(crate) fn filter_parsed<F>(tree: Map, parsed: &ParsedPath, mut callback: F) -> Map
where
    F: FnMut(Value, &Key, &[Key], &Map) -> Value,
{
    let original = tree.clone();
    let mut tree = tree;
    walker::filter(
        &mut tree,
        parsed.segments(),
        &mut Vec::new(),
        &original,
        &mut callback,
    );
    tree
}
