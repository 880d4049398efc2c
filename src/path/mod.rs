//! Path expressions over trees.
//!
//! A path addresses values in nested maps by joining keys with a separator
//! (`.` by default).
//!
//! # Supported Syntax
//!
//! - `foo.bar` - Nested keys
//! - `foo\.bar` - A key containing the separator (also `\*`, `\[`, `\]`, `\,`)
//! - `foo.*` - Every child of `foo` (wildcard)
//! - `foo.[bar,baz]` - Several children at once (group)
//! - `foo.[bar.baz,qux]` - Group members may be complete sub-paths
//!
//! # Examples
//!
//! ```
//! use treequill::document::parser::from_json_str;
//! use treequill::document::node::Value;
//! use treequill::path::PathEngine;
//!
//! let tree = from_json_str(r#"{"wild": [{"foo": 123}, {"foo": 234}]}"#).unwrap();
//! let mut engine = PathEngine::new();
//!
//! let foos = engine.get_path(&tree, "wild.*.foo", Value::Null).unwrap();
//! assert_eq!(foos, Value::from(vec![123, 234]));
//! ```

pub mod ast;
pub mod cache;
pub mod engine;
pub mod error;
pub mod list;
pub mod parser;
pub mod walker;

pub use ast::{GroupMember, ParsedPath, PathInput, PathSegment};
pub use cache::{PathCache, DEFAULT_CACHE_CAPACITY};
pub use engine::{PathEngine, RemoveOptions};
pub use error::PathError;
pub use list::{Columns, KeyColumn, ListOptions};
pub use parser::{can_use_fast_lane, Parser, DEFAULT_SEPARATOR};
