//! Execution state
//!
//! Holds mutable per-file state: the execution log and a record of every run
//! performed so far.

/// What happened to one RUN directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub tag: String,
    pub command: String,
    /// Line of the RUN directive
    pub line_number: usize,
    pub exit_code: i32,
    /// Expectations satisfied before the run finished or failed
    pub matched: usize,
}

/// Mutable state for a single file execution
#[derive(Debug, Default)]
pub struct Session {
    /// Execution log
    pub log: String,
    /// Runs in execution order
    pub runs: Vec<RunRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a log entry
    pub fn logf(&mut self, msg: &str) {
        self.log.push_str(msg);
        if !msg.ends_with('\n') {
            self.log.push('\n');
        }
    }

    /// Total expectations satisfied across all runs
    pub fn matched_count(&self) -> usize {
        self.runs.iter().map(|r| r.matched).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logf_terminates_lines() {
        let mut s = Session::new();
        s.logf("one");
        s.logf("two\n");
        assert_eq!(s.log, "one\ntwo\n");
    }

    #[test]
    fn test_matched_count() {
        let mut s = Session::new();
        for matched in [2, 0, 3] {
            s.runs.push(RunRecord {
                tag: "DEFAULT".into(),
                command: "true".into(),
                line_number: 1,
                exit_code: 0,
                matched,
            });
        }
        assert_eq!(s.matched_count(), 5);
    }
}
