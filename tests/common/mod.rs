//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use treequill::document::node::{Map, Value};
use treequill::document::parser::{from_json_str, value_from_json};

/// Parses any JSON value into a tree value.
pub fn json(s: &str) -> Value {
    value_from_json(&serde_json::from_str(s).unwrap())
}

/// Parses a JSON object or array into a tree.
pub fn tree(s: &str) -> Map {
    from_json_str(s).unwrap()
}

/// A tree with scalars, sequences, nested maps and lists of rows.
pub fn sample_tree() -> Map {
    tree(
        r#"{
            "foo": "bar",
            "bar": 123,
            "baz": [123, 234, ["foo", "bar"]],
            "rumpel": {
                "pumpel": {"foo": "pumpFoo", "bar": "pumpBar"},
                "grumpel": 555,
                "foo": 222
            },
            "wild": [
                {"foo": 123, "horse": {"carrot": 123, "stick": 234, "saddle": 345}},
                {"foo": 234, "horse": {"carrot": 562, "stick": 678, "saddle": 903}}
            ],
            "wild2": [{"foo": "asdf"}, {"foo": "bar"}, {"foo": "baz"}]
        }"#,
    )
}

/// Two rows with scalar columns and a nested map column.
pub fn sample_rows() -> Map {
    tree(
        r#"[
            {"id": "234", "title": "medium", "asdf": "asdf",
             "array": {"id": "12", "rumpel": "di", "bar": "baz"}},
            {"id": "123", "title": "apple", "asdf": "asdf",
             "array": {"id": "23", "rumpel": "pumpel", "foo": "bar"}}
        ]"#,
    )
}
