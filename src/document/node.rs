//! Tree node representation.
//!
//! This module provides the core data structures for representing the nested,
//! dynamically shaped trees treequill works on. A tree is an ordered [`Map`] of
//! [`Key`] to [`Value`]; sequences are simply maps keyed `0..n`, so every
//! container in a tree is a map.
//!
//! # Example
//!
//! ```
//! use treequill::document::node::{Key, Map, Value};
//!
//! let mut map = Map::new();
//! map.insert(Key::from("name"), Value::from("treequill"));
//! map.insert(Key::from("version"), Value::from(1));
//! let tree = Value::Map(map);
//!
//! assert!(tree.is_map());
//! // Canonical integer strings become integer keys
//! assert_eq!(Key::from("12"), Key::Index(12));
//! ```

use indexmap::IndexMap;
use log::debug;
use std::fmt;

/// An insertion ordered map, the only container kind of a tree.
pub type Map = IndexMap<Key, Value>;

/// A key inside a [`Map`].
///
/// Strings that look like canonical decimal integers (`"0"`, `"42"`, `"-7"`)
/// are normalized into [`Key::Index`], so `"1"` and `1` address the same entry.
/// Strings with leading zeros, a leading `+` or surrounding whitespace stay
/// [`Key::Name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// An integer key, used for sequence positions
    Index(i64),
    /// A string key
    Name(String),
}

impl Key {
    /// Returns the integer value if this is an index key.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(_) => None,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Key::Index(_))
    }
}

/// Parses `s` as a canonical decimal integer.
fn canonical_index(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    if s == "-0" {
        return None;
    }
    s.parse::<i64>().ok()
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        match canonical_index(s) {
            Some(i) => Key::Index(i),
            None => Key::Name(s.to_string()),
        }
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        match canonical_index(&s) {
            Some(i) => Key::Index(i),
            None => Key::Name(s),
        }
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key::from(s.as_str())
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Index(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Index(i as i64)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i as i64)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Name(s) => write!(f, "{}", s),
        }
    }
}

/// A value stored in a tree.
///
/// `Map` is the only container; every other variant is a leaf that the path
/// engine treats as opaque.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The absence of a value
    #[default]
    Null,
    /// A boolean
    Bool(bool),
    /// An integer number
    Int(i64),
    /// A floating point number
    Float(f64),
    /// A string
    String(String),
    /// A nested map (or sequence keyed `0..n`)
    Map(Map),
    /// Removal marker understood by [`merge`](crate::document::tree::merge)
    /// when removal is enabled: the key holding it is removed from the target.
    Unset,
}

impl Value {
    /// Returns true if this value is a map.
    ///
    /// # Example
    ///
    /// ```
    /// use treequill::document::node::{Map, Value};
    ///
    /// assert!(Value::Map(Map::new()).is_map());
    /// assert!(!Value::Int(42).is_map());
    /// ```
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the contained map, if any.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the contained map mutably, if any.
    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the contained string slice, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for a map without entries.
    pub fn is_empty_map(&self) -> bool {
        matches!(self, Value::Map(map) if map.is_empty())
    }

    /// Converts a value into a map key.
    ///
    /// Strings are normalized like [`Key::from`], integers become index keys,
    /// booleans become `0`/`1` and floats are truncated. Null, empty strings,
    /// maps and the unset marker cannot act as keys and yield `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use treequill::document::node::{Key, Value};
    ///
    /// assert_eq!(Value::from("234").to_key(), Some(Key::Index(234)));
    /// assert_eq!(Value::from("abc").to_key(), Some(Key::from("abc")));
    /// assert_eq!(Value::Null.to_key(), None);
    /// ```
    pub fn to_key(&self) -> Option<Key> {
        match self {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(Key::from(s.as_str())),
            Value::Int(i) => Some(Key::Index(*i)),
            Value::Bool(b) => Some(Key::Index(*b as i64)),
            Value::Float(f) if f.is_finite() => Some(Key::Index(f.trunc() as i64)),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<&Key> for Value {
    fn from(key: &Key) -> Self {
        match key {
            Key::Index(i) => Value::Int(*i),
            Key::Name(s) => Value::String(s.clone()),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    /// Builds a sequence keyed `0..n`.
    fn from(items: Vec<T>) -> Self {
        Value::Map(sequence(items))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null | Value::Unset => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "{}", s),
            Value::Map(map) => write!(f, "<map of {}>", map.len()),
        }
    }
}

/// Builds a sequence (a map keyed `0..n`) from the given items.
///
/// # Example
///
/// ```
/// use treequill::document::node::{sequence, Key, Value};
///
/// let seq = sequence(vec!["a", "b"]);
/// assert_eq!(seq.get(&Key::Index(1)), Some(&Value::from("b")));
/// ```
pub fn sequence<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Map {
    items
        .into_iter()
        .enumerate()
        .map(|(i, v)| (Key::from(i), v.into()))
        .collect()
}

/// Appends `value` under the next free integer key.
///
/// The next key is one past the greatest integer key in the map, or `0` when
/// the map has no non-negative integer keys. When the greatest key is
/// `i64::MAX` there is no next key: the value is dropped and `None` is
/// returned.
pub fn push(map: &mut Map, value: Value) -> Option<Key> {
    let next = match map.keys().filter_map(Key::as_index).max() {
        Some(max) => match max.max(-1).checked_add(1) {
            Some(next) => next,
            None => {
                debug!("no integer key left after {}, value not appended", max);
                return None;
            }
        },
        None => 0,
    };
    let key = Key::Index(next);
    map.insert(key.clone(), value);
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_normalizes_canonical_integers() {
        assert_eq!(Key::from("0"), Key::Index(0));
        assert_eq!(Key::from("42"), Key::Index(42));
        assert_eq!(Key::from("-7"), Key::Index(-7));
    }

    #[test]
    fn test_key_keeps_non_canonical_strings() {
        assert_eq!(Key::from("007"), Key::Name("007".to_string()));
        assert_eq!(Key::from("+1"), Key::Name("+1".to_string()));
        assert_eq!(Key::from("-0"), Key::Name("-0".to_string()));
        assert_eq!(Key::from(" 1"), Key::Name(" 1".to_string()));
        assert_eq!(Key::from("1.5"), Key::Name("1.5".to_string()));
        assert_eq!(Key::from(""), Key::Name(String::new()));
        assert_eq!(
            Key::from("99999999999999999999"),
            Key::Name("99999999999999999999".to_string())
        );
    }

    #[test]
    fn test_key_display() {
        assert_eq!(Key::Index(3).to_string(), "3");
        assert_eq!(Key::from("foo").to_string(), "foo");
    }

    #[test]
    fn test_value_to_key() {
        assert_eq!(Value::Int(5).to_key(), Some(Key::Index(5)));
        assert_eq!(Value::Bool(true).to_key(), Some(Key::Index(1)));
        assert_eq!(Value::Float(2.9).to_key(), Some(Key::Index(2)));
        assert_eq!(Value::from("").to_key(), None);
        assert_eq!(Value::Map(Map::new()).to_key(), None);
    }

    #[test]
    fn test_push_uses_next_index() {
        let mut map = Map::new();
        assert_eq!(push(&mut map, Value::from("a")), Some(Key::Index(0)));
        map.insert(Key::from("name"), Value::Null);
        map.insert(Key::Index(7), Value::Null);
        assert_eq!(push(&mut map, Value::from("b")), Some(Key::Index(8)));
    }

    #[test]
    fn test_push_after_max_index_drops_value() {
        let mut map = Map::new();
        map.insert(Key::Index(i64::MAX), Value::from(1));
        assert_eq!(push(&mut map, Value::from(2)), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_sequence_from_vec() {
        let value = Value::from(vec![1, 2, 3]);
        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&Key::Index(2)), Some(&Value::Int(3)));
    }
}
