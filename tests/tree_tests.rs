//! Integration tests for the structural tree helpers.

mod common;

use common::{json, sample_tree, tree};
use treequill::document::node::{Key, Map, Value};
use treequill::document::tree::{
    attach, flatten, is_array_list, is_associative, is_sequential, map_recursive, merge,
    merge_all, MergeOptions, NumericMerge,
};

// ============================================================================
// Merge
// ============================================================================

#[test]
fn test_merge_nested_maps() {
    let merged = merge(
        tree(r#"{"a": {"b": 1, "c": 2}, "d": "x"}"#),
        tree(r#"{"a": {"c": 3, "e": 4}, "d": "y"}"#),
        MergeOptions::default(),
    );
    assert_eq!(
        Value::Map(merged),
        json(r#"{"a": {"b": 1, "c": 3, "e": 4}, "d": "y"}"#)
    );
}

#[test]
fn test_merge_numeric_keys() {
    let a = || tree(r#"["a", ["foo"]]"#);
    let b = || tree(r#"["b", ["bar"]]"#);

    assert_eq!(
        Value::Map(merge(a(), b(), MergeOptions::default())),
        json(r#"["a", ["foo", "bar"], "b"]"#)
    );

    let strict = MergeOptions {
        numeric: NumericMerge::Strict,
        allow_removal: false,
    };
    assert_eq!(Value::Map(merge(a(), b(), strict)), json(r#"["b", ["bar"]]"#));

    let disabled = MergeOptions {
        numeric: NumericMerge::Disabled,
        allow_removal: false,
    };
    assert_eq!(
        Value::Map(merge(a(), b(), disabled)),
        json(r#"["a", ["foo"], "b", ["bar"]]"#)
    );
}

#[test]
fn test_merge_with_removal() {
    let mut b = Map::new();
    b.insert(Key::from("a"), Value::Unset);
    b.insert(Key::from("c"), Value::from(3));

    let options = MergeOptions {
        numeric: NumericMerge::Default,
        allow_removal: true,
    };
    let merged = merge(tree(r#"{"a": 1, "b": 2}"#), b.clone(), options);
    assert_eq!(Value::Map(merged), json(r#"{"b": 2, "c": 3}"#));

    // Without removal the marker is stored like any other value
    let merged = merge(tree(r#"{"a": 1}"#), b, MergeOptions::default());
    assert_eq!(merged.get(&Key::from("a")), Some(&Value::Unset));
}

#[test]
fn test_merge_with_empty_sides() {
    let t = sample_tree();
    assert_eq!(merge(Map::new(), t.clone(), MergeOptions::default()), t);
    assert_eq!(merge(t.clone(), Map::new(), MergeOptions::default()), t);
}

#[test]
fn test_merge_all() {
    let merged = merge_all(
        vec![tree(r#"{"a": 1}"#), tree(r#"{"b": 2}"#), tree(r#"{"a": 3}"#)],
        MergeOptions::default(),
    );
    assert_eq!(Value::Map(merged), json(r#"{"a": 3, "b": 2}"#));
    assert!(merge_all(Vec::new(), MergeOptions::default()).is_empty());
}

#[test]
fn test_attach() {
    let attached = attach(
        tree(r#"{"0": "a", "x": {"y": 1}}"#),
        tree(r#"{"0": "b", "x": {"z": 2}}"#),
    );
    assert_eq!(
        Value::Map(attached),
        json(r#"{"0": "a", "x": {"z": 2}, "1": "b"}"#)
    );
}

// ============================================================================
// Flatten and unflatten
// ============================================================================

#[test]
fn test_flatten() {
    let flat = flatten(&tree(r#"{"foo": 123, "bar": {"baz": 234, "qux": [1, 2]}, "e": {}}"#), ".");
    assert_eq!(
        Value::Map(flat),
        json(r#"{"foo": 123, "bar.baz": 234, "bar.qux.0": 1, "bar.qux.1": 2}"#)
    );
}

#[test]
fn test_flatten_escapes_separator_in_keys() {
    let flat = flatten(&tree(r#"{"a.b": {"c": 1}}"#), ".");
    assert_eq!(Value::Map(flat), json(r#"{"a\\.b.c": 1}"#));
}

#[test]
fn test_unflatten_inverts_flatten() {
    let original = tree(r#"{"a.b": {"c": 1}, "list": ["x", "y"], "n": null}"#);
    let flat = flatten(&original, ".");
    assert_eq!(treequill::unflatten(&flat).unwrap(), original);

    let t = sample_tree();
    assert_eq!(treequill::unflatten(&flatten(&t, ".")).unwrap(), t);
}

#[test]
fn test_unflatten_integer_keys() {
    let flat = tree(r#"["a", "b"]"#);
    assert_eq!(treequill::unflatten(&flat).unwrap(), flat);
}

// ============================================================================
// Recursive mapping
// ============================================================================

#[test]
fn test_map_recursive() {
    let t = tree(r#"{"a": {"b": 2, "c": "x"}, "d": 3}"#);
    let mut paths = Vec::new();
    let mapped = map_recursive(&t, |value, _key, path, original| {
        assert_eq!(original, &t);
        paths.push(path.to_vec());
        match value {
            Value::Int(i) => Value::Int(i * 10),
            other => other.clone(),
        }
    });

    assert_eq!(Value::Map(mapped), json(r#"{"a": {"b": 20, "c": "x"}, "d": 30}"#));
    assert_eq!(
        paths,
        vec![
            vec![Key::from("a"), Key::from("b")],
            vec![Key::from("a"), Key::from("c")],
            vec![Key::from("d")],
        ]
    );
}

// ============================================================================
// Predicates
// ============================================================================

#[test]
fn test_shape_predicates() {
    let seq = tree("[1, 2, 3]");
    assert!(is_sequential(&seq));
    assert!(!is_associative(&seq));
    assert!(!is_array_list(&seq));

    let assoc = tree(r#"{"a": 1, "0": 2}"#);
    assert!(is_associative(&assoc));
    assert!(!is_sequential(&assoc));

    let gaps = tree(r#"{"1": "a", "0": "b"}"#);
    assert!(!is_sequential(&gaps));
    assert!(!is_associative(&gaps));

    let rows = tree(r#"[{"a": 1}, []]"#);
    assert!(is_array_list(&rows));
    assert!(is_sequential(&Map::new()));
    assert!(is_array_list(&Map::new()));
}

#[test]
fn test_append_after_max_integer_key_is_dropped() {
    let a = tree(r#"{"9223372036854775807": "last"}"#);

    let merged = merge(a.clone(), tree(r#"["x"]"#), MergeOptions::default());
    assert_eq!(Value::Map(merged), json(r#"{"9223372036854775807": "last"}"#));

    let attached = attach(a, tree(r#"["x", "y"]"#));
    assert_eq!(attached.len(), 1);
}
