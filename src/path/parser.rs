//! Path expression parser.
//!
//! Turns strings like `foo.bar`, `foo\.bar.baz` or `foo.[bar,baz.qux]` into a
//! [`ParsedPath`]. Parsing happens in two passes: a [`Scanner`] splits the raw
//! text into tokens with escapes resolved, then the segment builder splits
//! the tokens on separators and bracket groups.

use log::debug;

use super::ast::{GroupMember, ParsedPath, PathInput, PathSegment};
use super::cache::{PathCache, DEFAULT_CACHE_CAPACITY};
use super::error::PathError;

/// Separator used when none is given.
pub const DEFAULT_SEPARATOR: &str = ".";

/// Characters with a meaning of their own inside a path.
pub const RESERVED_CHARS: [char; 4] = ['*', '[', ']', ','];

/// Returns true if `path` is a single literal key that needs no parsing.
///
/// # Example
///
/// ```
/// use treequill::path::can_use_fast_lane;
///
/// assert!(can_use_fast_lane("foo", "."));
/// assert!(!can_use_fast_lane("foo.bar", "."));
/// assert!(!can_use_fast_lane("foo*", "."));
/// assert!(!can_use_fast_lane("", "."));
/// ```
pub fn can_use_fast_lane(path: &str, separator: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    if !separator.is_empty() && path.contains(separator) {
        return false;
    }
    !path.contains(&RESERVED_CHARS[..])
}

/// A single unit of a path after escapes were resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Char(char),
    /// A character that was preceded by a backslash
    Escaped(char),
    Separator,
}

impl Token {
    fn is_blank(&self) -> bool {
        matches!(self, Token::Char(c) if c.is_whitespace())
    }

    fn is_unescaped(&self, expected: char) -> bool {
        *self == Token::Char(expected)
    }
}

/// Splits raw path text into tokens.
struct Scanner<'a> {
    input: &'a str,
    separator: &'a str,
    position: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str, separator: &'a str) -> Self {
        Self {
            input,
            separator,
            position: 0,
        }
    }

    fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(self.input.len());
        while let Some(ch) = self.peek() {
            if ch == '\\' && self.escape(&mut tokens) {
                continue;
            }
            if self.at_separator() {
                self.position += self.separator.len();
                tokens.push(Token::Separator);
                continue;
            }
            self.position += ch.len_utf8();
            tokens.push(Token::Char(ch));
        }
        tokens
    }

    /// Consumes an escape sequence at the current position, if there is one.
    fn escape(&mut self, tokens: &mut Vec<Token>) -> bool {
        let after = &self.input[self.position + 1..];
        if !self.separator.is_empty() && after.starts_with(self.separator) {
            tokens.extend(self.separator.chars().map(Token::Escaped));
            self.position += 1 + self.separator.len();
            return true;
        }
        match after.chars().next() {
            Some(ch) if RESERVED_CHARS.contains(&ch) => {
                tokens.push(Token::Escaped(ch));
                self.position += 1 + ch.len_utf8();
                true
            }
            _ => false,
        }
    }

    fn at_separator(&self) -> bool {
        !self.separator.is_empty() && self.input[self.position..].starts_with(self.separator)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }
}

/// Builds the text of a key, dropping unescaped whitespace at both ends.
fn key_text(tokens: &[Token]) -> String {
    let start = tokens.iter().position(|t| !t.is_blank());
    let end = tokens.iter().rposition(|t| !t.is_blank());
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => return String::new(),
    };

    tokens[start..=end]
        .iter()
        .filter_map(|token| match token {
            Token::Char(c) | Token::Escaped(c) => Some(*c),
            Token::Separator => None,
        })
        .collect()
}

/// Checks that unescaped brackets pair up.
fn check_balance(raw: &str, tokens: &[Token]) -> Result<(), PathError> {
    let mut depth = 0usize;
    for token in tokens {
        if token.is_unescaped('[') {
            depth += 1;
        } else if token.is_unescaped(']') {
            depth = depth
                .checked_sub(1)
                .ok_or_else(|| PathError::malformed(raw, "unexpected closing bracket"))?;
        }
    }
    if depth != 0 {
        return Err(PathError::malformed(raw, "unclosed bracket group"));
    }
    Ok(())
}

/// Finds the bracket closing the group opened at `open`.
fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        if token.is_unescaped('[') {
            depth += 1;
        } else if token.is_unescaped(']') {
            depth -= 1;
            if depth == 0 {
                return Some(index);
            }
        }
    }
    None
}

/// Builds the segments of a balanced token stream.
fn build_segments(raw: &str, tokens: &[Token]) -> Result<Vec<PathSegment>, PathError> {
    let mut segments = Vec::new();
    let mut text: Vec<Token> = Vec::new();
    let mut group: Option<Vec<GroupMember>> = None;
    let mut index = 0;

    while index < tokens.len() {
        let token = tokens[index];
        match token {
            Token::Separator => {
                finish_segment(&mut segments, &mut text, group.take());
                index += 1;
            }
            Token::Char('[') => {
                if group.is_some() || text.iter().any(|t| !t.is_blank()) {
                    return Err(PathError::malformed(
                        raw,
                        "a bracket group must form a whole path segment",
                    ));
                }
                let close = matching_close(tokens, index)
                    .ok_or_else(|| PathError::malformed(raw, "unclosed bracket group"))?;
                group = Some(build_group(raw, &tokens[index + 1..close])?);
                text.clear();
                index = close + 1;
            }
            Token::Char(']') => {
                return Err(PathError::malformed(raw, "unexpected closing bracket"));
            }
            _ => {
                if group.is_some() && !token.is_blank() {
                    return Err(PathError::malformed(
                        raw,
                        "a bracket group must form a whole path segment",
                    ));
                }
                text.push(token);
                index += 1;
            }
        }
    }
    finish_segment(&mut segments, &mut text, group);

    Ok(segments)
}

fn finish_segment(
    segments: &mut Vec<PathSegment>,
    text: &mut Vec<Token>,
    group: Option<Vec<GroupMember>>,
) {
    match group {
        Some(members) if !members.is_empty() => segments.push(PathSegment::Group(members)),
        Some(_) => {}
        None => {
            let key = key_text(text);
            if !key.is_empty() {
                segments.push(PathSegment::Key(key));
            }
        }
    }
    text.clear();
}

/// Splits the inside of a bracket group on its top level commas.
fn build_group(raw: &str, tokens: &[Token]) -> Result<Vec<GroupMember>, PathError> {
    let mut members = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, token) in tokens.iter().enumerate() {
        if token.is_unescaped('[') {
            depth += 1;
        } else if token.is_unescaped(']') {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && token.is_unescaped(',') {
            push_member(raw, &tokens[start..index], &mut members)?;
            start = index + 1;
        }
    }
    push_member(raw, &tokens[start..], &mut members)?;

    Ok(members)
}

fn push_member(
    raw: &str,
    tokens: &[Token],
    members: &mut Vec<GroupMember>,
) -> Result<(), PathError> {
    let is_sub_path = tokens
        .iter()
        .any(|t| *t == Token::Separator || t.is_unescaped('['));

    if is_sub_path {
        let segments = build_segments(raw, tokens)?;
        if !segments.is_empty() {
            members.push(GroupMember::Path(ParsedPath::new(segments)));
        }
    } else {
        let key = key_text(tokens);
        if !key.is_empty() {
            members.push(GroupMember::Key(key));
        }
    }
    Ok(())
}

/// Parses a string that can not take the fast lane, bypassing the cache.
///
/// The result may be empty; callers decide whether that is an error.
pub fn parse_slow_lane(raw: &str, separator: &str) -> Result<ParsedPath, PathError> {
    let tokens = Scanner::new(raw, separator).tokenize();
    check_balance(raw, &tokens)?;
    build_segments(raw, &tokens).map(ParsedPath::new)
}

/// Converts path expressions into [`ParsedPath`]s, remembering recent results.
///
/// # Example
///
/// ```
/// use treequill::path::{Parser, ParsedPath};
///
/// let mut parser = Parser::new();
/// let parsed = parser.parse("foo\\.bar.baz", ".", false).unwrap();
/// assert_eq!(parsed, ParsedPath::from(vec!["foo.bar", "baz"]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    cache: PathCache,
}

impl Parser {
    /// Creates a parser with the default cache capacity.
    pub fn new() -> Self {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            cache: PathCache::new(capacity),
        }
    }

    pub fn cache(&self) -> &PathCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Parses a path expression.
    ///
    /// Structured paths are returned as they are. Strings and numbers are
    /// looked up in the cache first, then parsed and cached. An empty result
    /// is an [`PathError::EmptyPath`] unless `allow_empty` is set.
    pub fn parse(
        &mut self,
        path: impl Into<PathInput>,
        separator: &str,
        allow_empty: bool,
    ) -> Result<ParsedPath, PathError> {
        match path.into() {
            PathInput::Parsed(parsed) => {
                if parsed.is_empty() && !allow_empty {
                    return Err(PathError::EmptyPath {
                        path: String::new(),
                    });
                }
                Ok(parsed)
            }
            PathInput::Text(raw) => self.parse_str(&raw, separator, allow_empty),
            PathInput::Number(n) => self.parse_str(&n.to_string(), separator, allow_empty),
        }
    }

    fn parse_str(
        &mut self,
        raw: &str,
        separator: &str,
        allow_empty: bool,
    ) -> Result<ParsedPath, PathError> {
        if raw.is_empty() {
            if allow_empty {
                return Ok(ParsedPath::default());
            }
            return Err(PathError::EmptyPath {
                path: String::new(),
            });
        }

        if let Some(parsed) = self.cache.get(raw, separator) {
            return Ok(parsed);
        }

        let parsed = if can_use_fast_lane(raw, separator) {
            ParsedPath::new(vec![PathSegment::Key(raw.to_string())])
        } else {
            debug!("parsing path {:?} with separator {:?}", raw, separator);
            parse_slow_lane(raw, separator)?
        };

        if parsed.is_empty() {
            if allow_empty {
                return Ok(parsed);
            }
            return Err(PathError::EmptyPath {
                path: raw.to_string(),
            });
        }

        self.cache.insert(raw, separator, parsed.clone());
        Ok(parsed)
    }
}
