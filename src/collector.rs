//! Directive collection
//!
//! Scans a source file once and groups its directives: RUN commands in source
//! order, CHECK expectations per tag in source order.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use crate::error::ScriptError;
use crate::parser::{parse_directive, CheckKind, Keyword};

/// A command to run, scoped to a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDirective {
    pub tag: String,
    /// Command text exactly as written after the colon
    pub command: String,
    pub line_number: usize,
}

/// A line the output of a tag's runs must contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    pub kind: CheckKind,
    /// Expected text exactly as written after the colon
    pub text: String,
    pub line_number: usize,
}

/// Directives collected from one source file.
///
/// Read-only once built.
#[derive(Debug, Default)]
pub struct Collector {
    name: String,
    runs: Vec<RunDirective>,
    expectations: HashMap<String, Vec<Expectation>>,
}

impl Collector {
    /// Scan the file at `path`.
    ///
    /// The file handle lives only for the duration of the scan and is closed
    /// on every return path, including read errors mid-file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let name = path.to_string_lossy().to_string();
        let wrap = |e: std::io::Error| {
            let mut err = ScriptError::from(e);
            err.message = format!("{}: {}", name, err.message);
            err
        };

        let reader = BufReader::new(File::open(path).map_err(wrap)?);
        let mut collector = Self {
            name: name.clone(),
            ..Default::default()
        };
        for (i, line) in reader.lines().enumerate() {
            let line = line.map_err(wrap)?;
            collector.push_line(&line, i + 1);
        }
        Ok(collector)
    }

    /// Build a collector from in-memory text. `name` is used in diagnostics.
    pub fn parse(text: &str, name: impl Into<String>) -> Self {
        let mut collector = Self {
            name: name.into(),
            ..Default::default()
        };
        for (i, line) in text.lines().enumerate() {
            collector.push_line(line, i + 1);
        }
        collector
    }

    fn push_line(&mut self, line: &str, line_number: usize) {
        let Some(directive) = parse_directive(line, line_number) else {
            return;
        };
        match directive.keyword {
            Keyword::Run => self.runs.push(RunDirective {
                tag: directive.tag,
                command: directive.payload,
                line_number,
            }),
            Keyword::Check(kind) => self
                .expectations
                .entry(directive.tag)
                .or_default()
                .push(Expectation {
                    kind,
                    text: directive.payload,
                    line_number,
                }),
        }
    }

    /// Source name (file path or the name given to `parse`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All RUN directives in source order
    pub fn runs(&self) -> &[RunDirective] {
        &self.runs
    }

    /// Expectations registered under `tag`, in source order.
    ///
    /// A tag that never received a CHECK is a lookup error.
    pub fn expectations(&self, tag: &str) -> Result<&[Expectation], ScriptError> {
        self.expectations
            .get(tag)
            .map(Vec::as_slice)
            .ok_or_else(|| ScriptError::no_such_tag(tag))
    }

    /// Tags that have at least one expectation, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.expectations.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}
