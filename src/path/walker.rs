//! Recursive traversal of trees along parsed paths.
//!
//! Each walker consumes the first segment of the path, resolves it against
//! the current map (see [`init_walker_step`]) and recurses with the rest.
//! Plain group members continue with the rest of the outer path; sub-path
//! members are resolved against the current map on their own.

use crate::document::node::{sequence, Key, Map, Value};
use crate::document::tree::{merge, MergeOptions};

use super::ast::{GroupMember, ParsedPath, PathSegment};

/// How the keys of a step were selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// A single literal key
    Default,
    /// Every key of the current map (`*`)
    Wildcard,
    /// The members of a bracket group
    Keys,
}

/// A key to process in a step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepKey<'p> {
    Key(Key),
    /// A group member holding a complete sub-path
    Path(&'p ParsedPath),
}

/// The first segment of a path, resolved against a map.
#[derive(Debug, Clone)]
pub struct WalkerStep<'p> {
    pub keys: Vec<StepKey<'p>>,
    pub kind: StepKind,
    /// True if no segments follow
    pub is_last: bool,
    /// The segments after this step
    pub rest: &'p [PathSegment],
}

/// Splits off the first segment of `path` and resolves its keys.
///
/// Returns `None` for an empty path.
pub fn init_walker_step<'p>(map: &Map, path: &'p [PathSegment]) -> Option<WalkerStep<'p>> {
    let (first, rest) = path.split_first()?;

    let (keys, kind) = match first {
        PathSegment::Group(members) => (
            members
                .iter()
                .map(|member| match member {
                    GroupMember::Key(key) => StepKey::Key(Key::from(key.as_str())),
                    GroupMember::Path(sub) => StepKey::Path(sub),
                })
                .collect(),
            StepKind::Keys,
        ),
        PathSegment::Key(key) if key == "*" => (
            map.keys().cloned().map(StepKey::Key).collect(),
            StepKind::Wildcard,
        ),
        PathSegment::Key(key) => (vec![StepKey::Key(Key::from(key.as_str()))], StepKind::Default),
    };

    Some(WalkerStep {
        keys,
        kind,
        is_last: rest.is_empty(),
        rest,
    })
}

/// Reads the values at `path`.
///
/// Missing keys and non-map intermediates resolve to `default`. In nested
/// mode (inside a group sub-path) results are always maps shaped like the
/// walked tree so they can be merged.
pub fn get(map: &Map, path: &[PathSegment], default: &Value, nested: bool) -> Value {
    let step = match init_walker_step(map, path) {
        Some(step) => step,
        None => return default.clone(),
    };

    let mut result = Map::new();
    for step_key in step.keys {
        let key = match step_key {
            StepKey::Path(sub) => {
                if let Value::Map(sub_result) = get(map, sub.segments(), default, true) {
                    result = merge(result, sub_result, MergeOptions::default());
                }
                continue;
            }
            StepKey::Key(key) => key,
        };

        let value = match map.get(&key) {
            None => default.clone(),
            Some(value) if step.is_last => value.clone(),
            Some(Value::Map(child)) => get(child, step.rest, default, nested),
            Some(_) => default.clone(),
        };
        result.insert(key, value);
    }

    if nested {
        return Value::Map(result);
    }

    match step.kind {
        StepKind::Default => result
            .into_iter()
            .next()
            .map(|(_, value)| value)
            .unwrap_or_else(|| default.clone()),
        StepKind::Wildcard if map.keys().next() == Some(&Key::Index(0)) => {
            Value::Map(sequence(result.into_values()))
        }
        _ => Value::Map(result),
    }
}

/// Marker for a path that does not fully resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFound;

/// Checks that every key selected by `path` exists.
pub fn has(map: &Map, path: &[PathSegment]) -> Result<(), NotFound> {
    if map.is_empty() {
        return Err(NotFound);
    }
    let step = init_walker_step(map, path).ok_or(NotFound)?;
    if step.keys.is_empty() {
        return Err(NotFound);
    }

    for step_key in step.keys {
        let key = match step_key {
            StepKey::Path(sub) => {
                has(map, sub.segments())?;
                continue;
            }
            StepKey::Key(key) => key,
        };

        let value = map.get(&key).ok_or(NotFound)?;
        if step.is_last {
            continue;
        }
        let child = value.as_map().ok_or(NotFound)?;
        has(child, step.rest)?;
    }

    Ok(())
}

/// Writes `value` at every key selected by `path`.
///
/// Missing intermediates are created and non-map intermediates replaced by
/// maps.
pub fn set(map: &mut Map, path: &[PathSegment], value: &Value) {
    let step = match init_walker_step(map, path) {
        Some(step) => step,
        None => return,
    };

    for step_key in step.keys {
        let key = match step_key {
            StepKey::Path(sub) => {
                set(map, sub.segments(), value);
                continue;
            }
            StepKey::Key(key) => key,
        };

        if step.is_last {
            map.insert(key, value.clone());
            continue;
        }

        let child = map.entry(key).or_insert_with(|| Value::Map(Map::new()));
        if !child.is_map() {
            *child = Value::Map(Map::new());
        }
        if let Value::Map(child) = child {
            set(child, step.rest, value);
        }
    }
}

/// Deletes every key selected by `path`.
///
/// Unless `keep_empty` is set, maps left empty by the removal are deleted
/// as well, bottom up.
pub fn remove(map: &mut Map, path: &[PathSegment], keep_empty: bool) {
    let step = match init_walker_step(map, path) {
        Some(step) => step,
        None => return,
    };

    for step_key in step.keys {
        let key = match step_key {
            StepKey::Path(sub) => {
                remove(map, sub.segments(), keep_empty);
                continue;
            }
            StepKey::Key(key) => key,
        };

        if step.is_last {
            map.shift_remove(&key);
            continue;
        }

        let now_empty = match map.get_mut(&key) {
            Some(Value::Map(child)) => {
                remove(child, step.rest, keep_empty);
                child.is_empty()
            }
            _ => false,
        };
        if now_empty && !keep_empty {
            map.shift_remove(&key);
        }
    }
}

/// Replaces every existing value selected by `path` with the callback result.
///
/// The callback receives the current value, its key, the keys leading to it
/// (the key included) and `original`, a snapshot of the tree before filtering.
pub fn filter<F>(
    map: &mut Map,
    path: &[PathSegment],
    local_path: &mut Vec<Key>,
    original: &Map,
    callback: &mut F,
) where
    F: FnMut(Value, &Key, &[Key], &Map) -> Value,
{
    let step = match init_walker_step(map, path) {
        Some(step) => step,
        None => return,
    };

    for step_key in step.keys {
        let key = match step_key {
            StepKey::Path(sub) => {
                filter(map, sub.segments(), local_path, original, callback);
                continue;
            }
            StepKey::Key(key) => key,
        };

        local_path.push(key.clone());
        match map.get_mut(&key) {
            Some(value) if step.is_last => {
                let current = std::mem::take(value);
                *value = callback(current, &key, local_path, original);
            }
            Some(Value::Map(child)) => filter(child, step.rest, local_path, original, callback),
            _ => {}
        }
        local_path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parser::parse_slow_lane;

    fn path(raw: &str) -> ParsedPath {
        parse_slow_lane(raw, ".").unwrap()
    }

    fn tree() -> Map {
        let mut inner = Map::new();
        inner.insert(Key::from("bar"), Value::from(1));
        inner.insert(Key::from("baz"), Value::from(2));
        let mut map = Map::new();
        map.insert(Key::from("foo"), Value::Map(inner));
        map.insert(Key::from("leaf"), Value::from("x"));
        map
    }

    #[test]
    fn test_init_walker_step_kinds() {
        let map = tree();
        let p = path("*.bar");
        let step = init_walker_step(&map, p.segments()).unwrap();
        assert_eq!(step.kind, StepKind::Wildcard);
        assert_eq!(step.keys.len(), 2);
        assert!(!step.is_last);

        let p = path("[a,b.c]");
        let step = init_walker_step(&map, p.segments()).unwrap();
        assert_eq!(step.kind, StepKind::Keys);
        assert!(step.is_last);
        assert!(matches!(step.keys[1], StepKey::Path(_)));

        assert!(init_walker_step(&map, &[]).is_none());
    }

    #[test]
    fn test_get_default_for_non_map_intermediate() {
        let map = tree();
        let value = get(&map, path("leaf.deeper").segments(), &Value::from("d"), false);
        assert_eq!(value, Value::from("d"));
    }

    #[test]
    fn test_has_requires_all_group_members() {
        let map = tree();
        assert!(has(&map, path("foo.[bar,baz]").segments()).is_ok());
        assert_eq!(has(&map, path("foo.[bar,nope]").segments()), Err(NotFound));
        assert_eq!(has(&map, path("leaf.x").segments()), Err(NotFound));
    }

    #[test]
    fn test_set_replaces_non_map_intermediate() {
        let mut map = tree();
        set(&mut map, path("leaf.x").segments(), &Value::from(5));
        let leaf = map.get(&Key::from("leaf")).and_then(Value::as_map).unwrap();
        assert_eq!(leaf.get(&Key::from("x")), Some(&Value::from(5)));
    }

    #[test]
    fn test_remove_cascades() {
        let mut map = tree();
        remove(&mut map, path("foo.[bar,baz]").segments(), false);
        assert!(!map.contains_key(&Key::from("foo")));

        let mut map = tree();
        remove(&mut map, path("foo.[bar,baz]").segments(), true);
        assert_eq!(map.get(&Key::from("foo")), Some(&Value::Map(Map::new())));
    }

    #[test]
    fn test_filter_reports_local_path() {
        let mut map = tree();
        let original = map.clone();
        let mut seen = Vec::new();
        filter(
            &mut map,
            path("foo.*").segments(),
            &mut Vec::new(),
            &original,
            &mut |value, _key, local_path, _original| {
                seen.push(local_path.to_vec());
                match value {
                    Value::Int(i) => Value::Int(i * 10),
                    other => other,
                }
            },
        );
        assert_eq!(
            seen,
            vec![
                vec![Key::from("foo"), Key::from("bar")],
                vec![Key::from("foo"), Key::from("baz")],
            ]
        );
        let foo = map.get(&Key::from("foo")).and_then(Value::as_map).unwrap();
        assert_eq!(foo.get(&Key::from("baz")), Some(&Value::from(20)));
    }
}
