//! Error types for path parsing.

use thiserror::Error;

/// Errors that can occur while turning a path expression into segments.
///
/// Walking a tree never fails once the path parsed; only the parse step
/// produces these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path resolved to zero segments.
    #[error("the given path \"{path}\" is empty")]
    EmptyPath { path: String },
    /// Brackets are unbalanced or a group is glued to other text.
    #[error("malformed path \"{path}\": {message}")]
    MalformedPath { path: String, message: String },
    /// A structured path contains a member that can not act as a key.
    #[error("the given path is not valid: found a member of type {found}")]
    TypeMismatch { found: String },
}

impl PathError {
    pub(crate) fn malformed(path: &str, message: impl Into<String>) -> Self {
        PathError::MalformedPath {
            path: path.to_string(),
            message: message.into(),
        }
    }
}
