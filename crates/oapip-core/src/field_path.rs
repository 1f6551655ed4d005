use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldPathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a JSON document, rendered as `$.inputs["my.input"][0]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldPath {
    segments: Vec<FieldPathSegment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    pub fn from_segments(segments: Vec<FieldPathSegment>) -> Self {
        Self { segments }
    }

    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(FieldPathSegment::Key(key.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(FieldPathSegment::Index(index));
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut child = self.clone();
        child.push_key(key);
        child
    }

    pub fn index(&self, index: usize) -> Self {
        let mut child = self.clone();
        child.push_index(index);
        child
    }

    pub fn join(&self, other: &FieldPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    pub fn segments(&self) -> &[FieldPathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Decodes an RFC 6901 pointer; purely numeric tokens become indices.
    pub fn from_json_pointer(pointer: &str) -> Self {
        let mut segments = Vec::new();
        for raw_segment in pointer.trim_start_matches('/').split('/') {
            if raw_segment.is_empty() {
                continue;
            }
            let decoded = raw_segment.replace("~1", "/").replace("~0", "~");
            match decoded.parse::<usize>() {
                Ok(index) => segments.push(FieldPathSegment::Index(index)),
                Err(_) => segments.push(FieldPathSegment::Key(decoded)),
            }
        }
        Self { segments }
    }

    pub fn to_json_pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            match segment {
                FieldPathSegment::Key(key) => out.push_str(&key.replace('~', "~0").replace('/', "~1")),
                FieldPathSegment::Index(index) => out.push_str(&index.to_string()),
            }
        }
        out
    }
}

impl Default for FieldPath {
    fn default() -> Self {
        Self::root()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FieldPathParseError {
    #[error("field path must start with '$' or an identifier")]
    InvalidStart,
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("invalid index segment")]
    InvalidIndex,
    #[error("unterminated quoted key")]
    UnterminatedQuote,
    #[error("expected '.' before key segment")]
    MissingDot,
    #[error("invalid key segment")]
    InvalidKey,
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
}

fn is_plain_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(is_plain_key_char)
}

struct Cursor<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn plain_key(&mut self) -> &'a str {
        let start = self.position;
        while self.peek().is_some_and(is_plain_key_char) {
            self.position += 1;
        }
        &self.input[start..self.position]
    }

    fn bracket(&mut self) -> Result<FieldPathSegment, FieldPathParseError> {
        match self.peek() {
            Some('"') => {
                self.bump();
                let mut key = String::new();
                loop {
                    match self.bump() {
                        None => return Err(FieldPathParseError::UnterminatedQuote),
                        Some('\\') => match self.bump() {
                            Some(escaped) => key.push(escaped),
                            None => return Err(FieldPathParseError::UnterminatedQuote),
                        },
                        Some('"') => break,
                        Some(c) => key.push(c),
                    }
                }
                match self.bump() {
                    Some(']') => Ok(FieldPathSegment::Key(key)),
                    None => Err(FieldPathParseError::UnexpectedEnd),
                    Some(c) => Err(FieldPathParseError::UnexpectedChar(c)),
                }
            }
            _ => {
                let start = self.position;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.position += 1;
                }
                if start == self.position || self.peek() != Some(']') {
                    return Err(FieldPathParseError::InvalidIndex);
                }
                let index = self.input[start..self.position]
                    .parse::<usize>()
                    .map_err(|_| FieldPathParseError::InvalidIndex)?;
                self.bump();
                Ok(FieldPathSegment::Index(index))
            }
        }
    }
}

impl std::str::FromStr for FieldPath {
    type Err = FieldPathParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut cursor = Cursor { input, position: 0 };
        let mut segments = Vec::new();

        match cursor.peek() {
            None => return Err(FieldPathParseError::InvalidStart),
            Some('$') => {
                cursor.bump();
            }
            Some(_) => {
                let key = cursor.plain_key();
                if key.is_empty() {
                    return Err(FieldPathParseError::InvalidStart);
                }
                segments.push(FieldPathSegment::Key(key.to_string()));
            }
        }

        while let Some(c) = cursor.bump() {
            match c {
                '.' => {
                    if cursor.peek().is_none() {
                        return Err(FieldPathParseError::UnexpectedEnd);
                    }
                    let key = cursor.plain_key();
                    if key.is_empty() {
                        return Err(FieldPathParseError::InvalidKey);
                    }
                    segments.push(FieldPathSegment::Key(key.to_string()));
                }
                '[' => segments.push(cursor.bracket()?),
                c if is_plain_key_char(c) => return Err(FieldPathParseError::MissingDot),
                c => return Err(FieldPathParseError::UnexpectedChar(c)),
            }
        }

        Ok(FieldPath::from_segments(segments))
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                FieldPathSegment::Key(key) if is_plain_key(key) => write!(f, ".{key}")?,
                FieldPathSegment::Key(key) => {
                    let escaped = key.replace('\\', "\\\\").replace('"', "\\\"");
                    write!(f, "[\"{escaped}\"]")?
                }
                FieldPathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "field_path_test.rs"]
mod tests;
