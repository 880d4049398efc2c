//! Structural helpers for trees.
//!
//! These are the utilities the path engine builds upon: the recursive merge
//! used to combine group results, plus attach, flatten, recursive mapping and
//! a few shape predicates. None of them parse path expressions; the path aware
//! counterparts (`unflatten`, `without`) live on
//! [`PathEngine`](crate::path::PathEngine).
//!
//! # Example
//!
//! ```
//! use treequill::document::node::{Key, Map, Value};
//! use treequill::document::tree::{merge, MergeOptions};
//!
//! let mut a = Map::new();
//! a.insert(Key::from("foo"), Value::from("bar"));
//! let mut b = Map::new();
//! b.insert(Key::from("baz"), Value::from(1));
//!
//! let merged = merge(a, b, MergeOptions::default());
//! assert_eq!(merged.len(), 2);
//! ```

use super::node::{push, Key, Map, Value};

/// How integer keys are treated by [`merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericMerge {
    /// Integer keyed maps are merged into each other, other integer keyed
    /// values are appended.
    #[default]
    Default,
    /// Every integer keyed value is merged (overwritten) like a string key.
    Strict,
    /// Every integer keyed value is appended.
    Disabled,
}

/// Options for [`merge`] and [`merge_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOptions {
    pub numeric: NumericMerge,
    /// Honor [`Value::Unset`] in the merged map by removing the key.
    pub allow_removal: bool,
}

/// Recursively merges `b` into `a`, the values of `b` winning.
///
/// If both sides hold a map under the same key the merge goes deeper. Integer
/// keys are special: by default a non-map value under an integer key is
/// appended to `a` instead of overwriting, so `["a"]` merged with `["b"]`
/// becomes `["a", "b"]` while `[["foo"]]` merged with `[["bar"]]` merges the
/// inner sequences into `[["foo", "bar"]]`. See [`NumericMerge`] to change that.
/// A value to append is dropped when `a` already holds the key `i64::MAX`.
pub fn merge(a: Map, b: Map, options: MergeOptions) -> Map {
    if !options.allow_removal && a.is_empty() {
        return b;
    }
    if b.is_empty() {
        return a;
    }

    let mut a = a;
    for (key, value) in b {
        if options.allow_removal && matches!(value, Value::Unset) {
            a.shift_remove(&key);
            continue;
        }

        if key.is_index() {
            let append = match options.numeric {
                NumericMerge::Default => !value.is_map(),
                NumericMerge::Strict => false,
                NumericMerge::Disabled => true,
            };
            if append {
                push(&mut a, value);
                continue;
            }
        }

        let value = match (a.get_mut(&key), value) {
            (Some(Value::Map(existing)), Value::Map(incoming)) => {
                Value::Map(merge(std::mem::take(existing), incoming, options))
            }
            (_, value) => value,
        };
        a.insert(key, value);
    }

    a
}

/// Merges all given maps from left to right.
///
/// Returns an empty map if `maps` is empty.
pub fn merge_all<I>(maps: I, options: MergeOptions) -> Map
where
    I: IntoIterator<Item = Map>,
{
    let mut maps = maps.into_iter();
    let first = maps.next().unwrap_or_default();
    maps.fold(first, |acc, next| merge(acc, next, options))
}

/// Attaches `b` to the end of `a`.
///
/// Integer keyed values of `b` are appended, string keyed values are set.
/// Unlike [`merge`] this never recurses. Appending stops at the key
/// `i64::MAX`, see [`push`].
pub fn attach(a: Map, b: Map) -> Map {
    let mut a = a;
    for (key, value) in b {
        if key.is_index() {
            push(&mut a, value);
        } else {
            a.insert(key, value);
        }
    }
    a
}

/// Flattens a tree into a single level map keyed by paths.
///
/// `{"foo": 123, "bar": {"baz": 234}}` becomes `{"foo": 123, "bar.baz": 234}`.
/// Occurrences of the separator inside keys are escaped with a backslash so
/// the result can be inflated again. Empty child maps produce no entry.
pub fn flatten(map: &Map, separator: &str) -> Map {
    let mut out = Map::new();
    let mut path = Vec::new();
    flatten_walker(&mut out, map, &mut path, separator);
    out
}

fn flatten_walker(out: &mut Map, map: &Map, path: &mut Vec<String>, separator: &str) {
    for (key, value) in map {
        let escaped = key.to_string().replace(separator, &format!("\\{}", separator));
        path.push(escaped);
        match value {
            Value::Map(child) => flatten_walker(out, child, path, separator),
            leaf => {
                out.insert(Key::from(path.join(separator)), leaf.clone());
            }
        }
        path.pop();
    }
}

/// Works like mapping over a map, but recursively for every leaf.
///
/// The callback receives the leaf value, its key, the list of keys leading to
/// it and the untouched input map.
///
/// # Example
///
/// ```
/// use treequill::document::node::{Key, Map, Value};
/// use treequill::document::tree::map_recursive;
///
/// let mut inner = Map::new();
/// inner.insert(Key::from("b"), Value::from(2));
/// let mut map = Map::new();
/// map.insert(Key::from("a"), Value::Map(inner));
///
/// let doubled = map_recursive(&map, |value, _key, _path, _original| match value {
///     Value::Int(i) => Value::Int(i * 2),
///     other => other.clone(),
/// });
/// ```
pub fn map_recursive<F>(map: &Map, mut callback: F) -> Map
where
    F: FnMut(&Value, &Key, &[Key], &Map) -> Value,
{
    let mut path = Vec::new();
    map_recursive_walker(map, map, &mut path, &mut callback)
}

fn map_recursive_walker<F>(
    original: &Map,
    current: &Map,
    path: &mut Vec<Key>,
    callback: &mut F,
) -> Map
where
    F: FnMut(&Value, &Key, &[Key], &Map) -> Value,
{
    let mut output = Map::with_capacity(current.len());
    for (key, value) in current {
        path.push(key.clone());
        let mapped = match value {
            Value::Map(child) => Value::Map(map_recursive_walker(original, child, path, callback)),
            leaf => callback(leaf, key, path, original),
        };
        output.insert(key.clone(), mapped);
        path.pop();
    }
    output
}

/// Returns true if the map has at least one string key.
pub fn is_associative(map: &Map) -> bool {
    map.keys().any(|key| !key.is_index())
}

/// Returns true if the keys are exactly `0..n` in order.
pub fn is_sequential(map: &Map) -> bool {
    map.keys()
        .enumerate()
        .all(|(i, key)| key.as_index() == Some(i as i64))
}

/// Returns true if every value of the map is itself a map.
pub fn is_array_list(map: &Map) -> bool {
    map.values().all(Value::is_map)
}
