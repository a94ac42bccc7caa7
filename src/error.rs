//! Harness errors

use std::fmt;

/// The kind of harness error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source file does not exist
    FileNotFound,
    /// Source file could not be read
    Io,
    /// A RUN directive names a tag with no CHECK directives
    NoSuchTag,
    /// An expectation was not found in the remaining output
    PatternMismatch,
}

/// A harness error with file/line context
#[derive(Debug)]
pub struct ScriptError {
    pub kind: ErrorKind,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<usize>,
    pub tag: Option<String>,
}

impl ScriptError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            file: None,
            line: None,
            tag: None,
        }
    }

    pub fn with_location(mut self, file: impl Into<String>, line: usize) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Lookup failure for a tag that never received a CHECK.
    pub fn no_such_tag(tag: &str) -> Self {
        Self::new(ErrorKind::NoSuchTag, format!("No checks are in place for '{}'.", tag))
            .with_tag(tag)
    }

    /// An expectation that the forward scan did not find.
    pub fn mismatch(tag: &str, text: &str) -> Self {
        Self::new(ErrorKind::PatternMismatch, format!("Failed to match: '{}:{}'.", tag, text))
            .with_tag(tag)
    }

    pub fn is_lookup(&self) -> bool {
        self.kind == ErrorKind::NoSuchTag
    }

    pub fn is_mismatch(&self) -> bool {
        self.kind == ErrorKind::PatternMismatch
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}:", file)?;
        }
        if let Some(line) = self.line {
            write!(f, "{}:", line)?;
        }
        if self.file.is_some() || self.line.is_some() {
            write!(f, " ")?;
        }
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ScriptError {}

impl From<std::io::Error> for ScriptError {
    fn from(e: std::io::Error) -> Self {
        let kind = if e.kind() == std::io::ErrorKind::NotFound {
            ErrorKind::FileNotFound
        } else {
            ErrorKind::Io
        };
        Self::new(kind, e.to_string())
    }
}
