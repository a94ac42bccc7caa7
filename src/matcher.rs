//! Sequential output matching
//!
//! A [`Matcher`] walks the output lines of one run with a forward-only cursor.
//! Each expectation resumes scanning where the previous one stopped, so a
//! tag's expectations must appear in the output in declaration order.

use crate::collector::Expectation;
use crate::parser::CheckKind;

/// Forward-only scanner over one run's output
#[derive(Debug)]
pub struct Matcher<'a> {
    /// `None` when the run exited nonzero
    lines: Option<&'a [String]>,
    cursor: usize,
}

impl<'a> Matcher<'a> {
    pub fn new(lines: Option<&'a [String]>) -> Self {
        Self { lines, cursor: 0 }
    }

    /// Index of the next line to be scanned
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True when no line remains to be consumed
    pub fn is_exhausted(&self) -> bool {
        self.lines.map_or(true, |lines| self.cursor >= lines.len())
    }

    /// Check one expectation against the remaining output.
    ///
    /// On success the cursor sits just past the matching line. On failure
    /// it sits at the end of the output.
    pub fn check(&mut self, expectation: &Expectation) -> bool {
        match expectation.kind {
            CheckKind::Check => self.scan(&expectation.text),
            CheckKind::Reserved(_) => false,
        }
    }

    fn scan(&mut self, text: &str) -> bool {
        let Some(lines) = self.lines else {
            return false;
        };
        let want = text.trim();
        while self.cursor < lines.len() {
            let line = &lines[self.cursor];
            self.cursor += 1;
            if line.trim() == want {
                return true;
            }
        }
        false
    }
}
