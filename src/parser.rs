//! Directive line parser
//!
//! Recognizes the two comment directives a source file may carry:
//! - `// RUN: cmd` and `// RUN-tag: cmd` name a shell command to execute
//! - `// CHECK: text` and `// CHECK-tag: text` name a line the output must contain
//!
//! Leading whitespace before `//` and spacing between `//` and the keyword are
//! not significant. The payload after the colon is kept verbatim; trimming is
//! left to the matcher.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tag used by directives without a `-tag` suffix
pub const DEFAULT_TAG: &str = "DEFAULT";

static RUN_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*//\s*RUN(-[^:\s]+)?:(.+)$").unwrap());

static CHECK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*//\s*(CHECK)(-[^:\s]+)?:(.+)$").unwrap());

/// Directive keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyword {
    /// `RUN` — command to execute
    Run,
    /// A check keyword; the kind says how its text is matched
    Check(CheckKind),
}

/// How an expectation is matched against output.
///
/// Only `CHECK` is matched today. Any other kind is carried through but
/// never satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckKind {
    /// Literal line equality after trimming
    Check,
    /// Reserved keyword, always fails
    Reserved(String),
}

impl CheckKind {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "CHECK" => CheckKind::Check,
            other => CheckKind::Reserved(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CheckKind::Check => "CHECK",
            CheckKind::Reserved(k) => k,
        }
    }
}

/// A parsed directive line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub keyword: Keyword,
    /// Resolved tag (`DEFAULT` when no suffix was given)
    pub tag: String,
    /// Text after the colon, untrimmed
    pub payload: String,
    /// Line number in the source file
    pub line_number: usize,
}

/// Resolve the optional `-tag` suffix captured from a directive keyword.
pub fn resolve_tag(suffix: Option<&str>) -> String {
    match suffix {
        None | Some("") => DEFAULT_TAG.to_string(),
        Some(s) => s.strip_prefix('-').unwrap_or(s).to_string(),
    }
}

/// Parse a single source line.
///
/// Returns `None` for lines that carry no directive. Both patterns are tried
/// on every line; the keywords are disjoint so at most one can match.
pub fn parse_directive(line: &str, line_number: usize) -> Option<Directive> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    let run = RUN_LINE.captures(line).map(|caps| Directive {
        keyword: Keyword::Run,
        tag: resolve_tag(caps.get(1).map(|m| m.as_str())),
        payload: caps[2].to_string(),
        line_number,
    });

    let check = CHECK_LINE.captures(line).map(|caps| Directive {
        keyword: Keyword::Check(CheckKind::from_keyword(&caps[1])),
        tag: resolve_tag(caps.get(2).map(|m| m.as_str())),
        payload: caps[3].to_string(),
        line_number,
    });

    run.or(check)
}
