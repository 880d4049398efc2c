//! Parsed representation of path expressions.

use crate::document::node::{sequence, Map, Value};

use super::error::PathError;

/// One unit of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A literal key. The wildcard is stored as the literal key `*`.
    Key(String),
    /// A bracketed group of alternatives (`[a,b,c.d]`)
    Group(Vec<GroupMember>),
}

/// One alternative inside a [`PathSegment::Group`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupMember {
    /// A key resolved at the level of the group
    Key(String),
    /// A complete sub-path resolved against the map holding the group
    Path(ParsedPath),
}

/// A normalized path expression.
///
/// # Example
///
/// ```
/// use treequill::path::{ParsedPath, PathSegment};
///
/// let path = ParsedPath::from(vec!["foo", "bar"]);
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.segments()[0], PathSegment::Key("foo".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedPath {
    segments: Vec<PathSegment>,
}

impl ParsedPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Appends the segments of `other` to this path.
    pub fn concat(mut self, other: ParsedPath) -> Self {
        self.segments.extend(other.segments);
        self
    }

    /// Converts the path into its structured tree form.
    ///
    /// Keys become strings, groups become sequences and sub-paths inside a
    /// group become nested sequences, so the result can be fed back through
    /// [`ParsedPath::try_from`].
    pub fn to_value(&self) -> Value {
        Value::Map(sequence(self.segments.iter().map(|segment| match segment {
            PathSegment::Key(key) => Value::from(key.as_str()),
            PathSegment::Group(members) => Value::Map(sequence(members.iter().map(
                |member| match member {
                    GroupMember::Key(key) => Value::from(key.as_str()),
                    GroupMember::Path(path) => path.to_value(),
                },
            ))),
        })))
    }
}

impl From<Vec<PathSegment>> for ParsedPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self::new(segments)
    }
}

impl From<Vec<&str>> for ParsedPath {
    /// Builds a path of literal keys.
    fn from(keys: Vec<&str>) -> Self {
        Self::new(
            keys.into_iter()
                .map(|key| PathSegment::Key(key.to_string()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a ParsedPath {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Name of a value's type, used in error messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Int(_) => "int",
        Value::Float(_) => "float",
        Value::String(_) => "string",
        Value::Map(_) => "map",
        Value::Unset => "unset",
    }
}

/// Converts a scalar path member into key text.
fn member_text(value: &Value) -> Result<String, PathError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        other => Err(PathError::TypeMismatch {
            found: type_name(other).to_string(),
        }),
    }
}

fn group_from_map(map: &Map) -> Result<Vec<GroupMember>, PathError> {
    map.values()
        .map(|value| match value {
            Value::Map(sub) => {
                let path = path_from_map(sub)?;
                if path.is_empty() {
                    return Err(PathError::MalformedPath {
                        path: String::new(),
                        message: "a group contains an empty sub-path".to_string(),
                    });
                }
                Ok(GroupMember::Path(path))
            }
            other => member_text(other).map(GroupMember::Key),
        })
        .collect()
}

fn path_from_map(map: &Map) -> Result<ParsedPath, PathError> {
    let segments = map
        .values()
        .map(|element| match element {
            Value::Map(group) => group_from_map(group).map(PathSegment::Group),
            other => member_text(other).map(PathSegment::Key),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedPath::new(segments))
}

impl TryFrom<&Value> for ParsedPath {
    type Error = PathError;

    /// Validates a structured path.
    ///
    /// The value must be a sequence whose elements are keys (strings or
    /// numbers) or sequences (groups). Inside a group, a sequence is a
    /// sub-path. Booleans, nulls and the unset marker are rejected.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let map = value.as_map().ok_or_else(|| PathError::TypeMismatch {
            found: type_name(value).to_string(),
        })?;
        path_from_map(map)
    }
}

/// Everything accepted where a path is expected.
#[derive(Debug, Clone, PartialEq)]
pub enum PathInput {
    /// A path expression to parse
    Text(String),
    /// A number, handled as its decimal text
    Number(i64),
    /// An already structured path
    Parsed(ParsedPath),
}

impl PathInput {
    /// Returns the raw text of string and number inputs.
    pub fn as_text(&self) -> Option<String> {
        match self {
            PathInput::Text(s) => Some(s.clone()),
            PathInput::Number(n) => Some(n.to_string()),
            PathInput::Parsed(_) => None,
        }
    }
}

impl From<&str> for PathInput {
    fn from(s: &str) -> Self {
        PathInput::Text(s.to_string())
    }
}

impl From<String> for PathInput {
    fn from(s: String) -> Self {
        PathInput::Text(s)
    }
}

impl From<&String> for PathInput {
    fn from(s: &String) -> Self {
        PathInput::Text(s.clone())
    }
}

impl From<i64> for PathInput {
    fn from(n: i64) -> Self {
        PathInput::Number(n)
    }
}

impl From<i32> for PathInput {
    fn from(n: i32) -> Self {
        PathInput::Number(n as i64)
    }
}

impl From<ParsedPath> for PathInput {
    fn from(path: ParsedPath) -> Self {
        PathInput::Parsed(path)
    }
}

impl From<&ParsedPath> for PathInput {
    fn from(path: &ParsedPath) -> Self {
        PathInput::Parsed(path.clone())
    }
}

impl From<Vec<&str>> for PathInput {
    fn from(keys: Vec<&str>) -> Self {
        PathInput::Parsed(ParsedPath::from(keys))
    }
}

impl TryFrom<&Value> for PathInput {
    type Error = PathError;

    /// Accepts strings, numbers, null (the empty path) and structured paths.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(PathInput::Text(s.clone())),
            Value::Int(i) => Ok(PathInput::Number(*i)),
            Value::Float(f) => Ok(PathInput::Text(f.to_string())),
            Value::Null => Ok(PathInput::Text(String::new())),
            Value::Map(_) => ParsedPath::try_from(value).map(PathInput::Parsed),
            other => Err(PathError::TypeMismatch {
                found: type_name(other).to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_path_roundtrip() {
        let path = ParsedPath::new(vec![
            PathSegment::Key("foo".to_string()),
            PathSegment::Group(vec![
                GroupMember::Key("bar".to_string()),
                GroupMember::Path(ParsedPath::from(vec!["foo", "bar"])),
            ]),
        ]);
        let value = path.to_value();
        assert_eq!(ParsedPath::try_from(&value).unwrap(), path);
    }

    #[test]
    fn test_structured_path_accepts_numbers() {
        let value = Value::from(vec![Value::from("a"), Value::from(1), Value::from(1.5)]);
        let path = ParsedPath::try_from(&value).unwrap();
        assert_eq!(path, ParsedPath::from(vec!["a", "1", "1.5"]));
    }

    #[test]
    fn test_structured_path_rejects_bool_and_null() {
        let value = Value::from(vec![Value::from("a"), Value::Bool(true)]);
        assert_eq!(
            ParsedPath::try_from(&value),
            Err(PathError::TypeMismatch {
                found: "bool".to_string()
            })
        );

        let nested = Value::from(vec![Value::from(vec![Value::from("a"), Value::Null])]);
        assert!(matches!(
            ParsedPath::try_from(&nested),
            Err(PathError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_structured_group_rejects_empty_sub_path() {
        let value = Value::from(vec![Value::from(vec![Value::Map(Map::new())])]);
        assert!(matches!(
            ParsedPath::try_from(&value),
            Err(PathError::MalformedPath { .. })
        ));
    }

    #[test]
    fn test_path_input_from_value() {
        assert_eq!(
            PathInput::try_from(&Value::from("a.b")).unwrap(),
            PathInput::Text("a.b".to_string())
        );
        assert_eq!(
            PathInput::try_from(&Value::Int(3)).unwrap(),
            PathInput::Number(3)
        );
        assert!(PathInput::try_from(&Value::Bool(false)).is_err());
    }
}
