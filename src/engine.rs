//! Harness engine
//!
//! The Engine drives the pipeline for one source file: every RUN directive is
//! executed in source order, and a fresh [`Matcher`] checks that run's output
//! against all expectations of its tag. The first failure stops the file.

use std::path::Path;
use crate::collector::Collector;
use crate::error::ScriptError;
use crate::exec::{Shell, ShellConfig, SystemShell};
use crate::matcher::Matcher;
use crate::parser::DEFAULT_TAG;
use crate::state::{RunRecord, Session};

/// The harness engine — holds the shell used for RUN commands
pub struct Engine {
    shell: Box<dyn Shell>,
    /// Whether to suppress directive logging
    pub quiet: bool,
}

impl Engine {
    /// Create an engine running commands through the platform shell
    pub fn new() -> Self {
        Self::with_shell(Box::new(SystemShell::default()))
    }

    /// Create an engine with a configured system shell
    pub fn with_config(config: ShellConfig) -> Self {
        Self::with_shell(Box::new(SystemShell::new(config)))
    }

    /// Create an engine with a custom shell
    pub fn with_shell(shell: Box<dyn Shell>) -> Self {
        Self { shell, quiet: false }
    }

    /// Collect directives from `path` and execute them.
    pub fn execute_file(
        &self,
        session: &mut Session,
        path: impl AsRef<Path>,
    ) -> Result<(), ScriptError> {
        let collector = Collector::open(path)?;
        self.execute(session, &collector)
    }

    /// Execute the RUN directives of an already collected file
    pub fn execute(&self, session: &mut Session, collector: &Collector) -> Result<(), ScriptError> {
        let filename = collector.name();

        for run in collector.runs() {
            if !self.quiet {
                session.logf(&format!("> {}: {}", keyword("RUN", &run.tag), run.command.trim()));
            }

            let output = self.shell.run(&run.command);

            if !output.stdout.is_empty() {
                session.logf(&format!("[stdout]\n{}", output.stdout));
            }
            if !output.stderr.is_empty() {
                session.logf(&format!("[stderr]\n{}", output.stderr));
            }
            if !output.success() {
                session.logf(&format!("[exit code {}]", output.code));
            }

            session.runs.push(RunRecord {
                tag: run.tag.clone(),
                command: run.command.clone(),
                line_number: run.line_number,
                exit_code: output.code,
                matched: 0,
            });

            let expectations = collector
                .expectations(&run.tag)
                .map_err(|e| e.with_location(filename, run.line_number))?;

            let lines = output.lines();
            let mut matcher = Matcher::new(lines.as_deref());

            for expectation in expectations {
                let name = keyword(expectation.kind.as_str(), &run.tag);
                if !matcher.check(expectation) {
                    session.logf(&format!("{}: {} [no match]", name, expectation.text.trim()));
                    return Err(ScriptError::mismatch(&run.tag, expectation.text.trim())
                        .with_location(filename, expectation.line_number));
                }
                if !self.quiet {
                    session.logf(&format!(
                        "{}: {} [output line {}]",
                        name,
                        expectation.text.trim(),
                        matcher.cursor(),
                    ));
                }
                if let Some(record) = session.runs.last_mut() {
                    record.matched += 1;
                }
            }
        }

        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a keyword the way it appears in source: `RUN` or `RUN-tag`
fn keyword(base: &str, tag: &str) -> String {
    if tag == DEFAULT_TAG {
        base.to_string()
    } else {
        format!("{}-{}", base, tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::error::ErrorKind;
    use crate::exec::{ShellOutput, EXIT_NOT_FOUND};

    /// Shell that answers from a table instead of spawning processes
    struct FakeShell(HashMap<String, ShellOutput>);

    impl FakeShell {
        fn new(entries: &[(&str, i32, &str)]) -> Self {
            let map = entries
                .iter()
                .map(|(cmd, code, stdout)| {
                    (cmd.to_string(), ShellOutput {
                        code: *code,
                        stdout: stdout.to_string(),
                        stderr: String::new(),
                    })
                })
                .collect();
            Self(map)
        }
    }

    impl Shell for FakeShell {
        fn run(&self, command: &str) -> ShellOutput {
            self.0.get(command.trim()).cloned().unwrap_or(ShellOutput {
                code: EXIT_NOT_FOUND,
                stdout: String::new(),
                stderr: format!("not found: {}", command),
            })
        }
    }

    fn run(source: &str, shell: FakeShell) -> (Result<(), ScriptError>, Session) {
        let engine = Engine::with_shell(Box::new(shell));
        let collector = Collector::parse(source, "t.lox");
        let mut session = Session::new();
        let result = engine.execute(&mut session, &collector);
        (result, session)
    }

    #[test]
    fn test_single_match() {
        let shell = FakeShell::new(&[("echo hello", 0, "hello")]);
        let (result, session) = run("// RUN: echo hello\n// CHECK: hello\n", shell);
        assert!(result.is_ok());
        assert_eq!(session.runs.len(), 1);
        assert_eq!(session.runs[0].matched, 1);
        assert!(session.log.contains("> RUN: echo hello"));
    }

    #[test]
    fn test_mismatch_names_tag_and_text() {
        let shell = FakeShell::new(&[("echo foo", 0, "foo")]);
        let (result, _) = run("// RUN: echo foo\n// CHECK: bar\n", shell);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::PatternMismatch);
        assert_eq!(err.to_string(), "t.lox:2: Failed to match: 'DEFAULT:bar'.");
    }

    #[test]
    fn test_tagged_sequence() {
        let shell = FakeShell::new(&[("printf 'a\\nb\\n'", 0, "a\nb")]);
        let source = "// RUN-x: printf 'a\\nb\\n'\n// CHECK-x: a\n// CHECK-x: b\n";
        let (result, session) = run(source, shell);
        assert!(result.is_ok());
        assert_eq!(session.runs[0].matched, 2);
        assert!(session.log.contains("CHECK-x: a [output line 1]"));
        assert!(session.log.contains("CHECK-x: b [output line 2]"));
    }

    #[test]
    fn test_missing_checks_is_fatal() {
        let shell = FakeShell::new(&[("echo hi", 0, "hi")]);
        let (result, session) = run("// RUN-x: echo hi\n", shell);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoSuchTag);
        assert_eq!(err.to_string(), "t.lox:1: No checks are in place for 'x'.");
        // the command still ran
        assert_eq!(session.runs.len(), 1);
    }

    #[test]
    fn test_nonzero_exit_yields_no_output() {
        let shell = FakeShell::new(&[("false", 1, "")]);
        let (result, session) = run("// RUN: false\n// CHECK: anything\n", shell);
        assert_eq!(result.unwrap_err().kind, ErrorKind::PatternMismatch);
        assert_eq!(session.runs[0].exit_code, 1);
        assert!(session.log.contains("[exit code 1]"));
    }

    #[test]
    fn test_nonzero_exit_hides_matching_stdout() {
        let shell = FakeShell::new(&[("build", 2, "ok")]);
        let (result, _) = run("// RUN: build\n// CHECK: ok\n", shell);
        assert!(result.is_err());
    }

    #[test]
    fn test_each_run_gets_fresh_matcher() {
        let shell = FakeShell::new(&[("one", 0, "a\nb"), ("two", 0, "a\nb")]);
        let source = "// RUN: one\n// RUN: two\n// CHECK: a\n// CHECK: b\n";
        let (result, session) = run(source, shell);
        assert!(result.is_ok());
        assert_eq!(session.runs.len(), 2);
        assert_eq!(session.matched_count(), 4);
    }

    #[test]
    fn test_tags_are_independent() {
        let shell = FakeShell::new(&[("left", 0, "l"), ("right", 0, "r")]);
        let source = "\
// RUN-l: left
// RUN-r: right
// CHECK-l: l
// CHECK-r: r
";
        let (result, _) = run(source, shell);
        assert!(result.is_ok());
    }

    #[test]
    fn test_first_failure_stops_execution() {
        let shell = FakeShell::new(&[("first", 0, "x"), ("second", 0, "y")]);
        let source = "// RUN-a: first\n// RUN-b: second\n// CHECK-a: nope\n// CHECK-b: y\n";
        let (result, session) = run(source, shell);
        assert!(result.is_err());
        assert_eq!(session.runs.len(), 1);
    }

    #[test]
    fn test_out_of_order_checks_fail() {
        let shell = FakeShell::new(&[("cmd", 0, "a\nb")]);
        let (result, session) = run("// RUN: cmd\n// CHECK: b\n// CHECK: a\n", shell);
        let err = result.unwrap_err();
        assert_eq!(err.line, Some(3));
        assert_eq!(session.runs[0].matched, 1);
    }

    #[test]
    fn test_no_runs_is_success() {
        let (result, session) = run("// CHECK: orphan\n", FakeShell::new(&[]));
        assert!(result.is_ok());
        assert!(session.runs.is_empty());
    }

    #[test]
    fn test_quiet_suppresses_directive_log() {
        let engine = {
            let mut e = Engine::with_shell(Box::new(FakeShell::new(&[("echo hi", 0, "hi")])));
            e.quiet = true;
            e
        };
        let collector = Collector::parse("// RUN: echo hi\n// CHECK: hi\n", "t");
        let mut session = Session::new();
        engine.execute(&mut session, &collector).unwrap();
        assert!(!session.log.contains("> RUN"));
        assert!(session.log.contains("[stdout]\nhi"));
    }

    #[test]
    fn test_execute_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new();
        let err = Engine::new()
            .execute_file(&mut session, dir.path().join("absent.lox"))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::FileNotFound);
    }

    #[test]
    fn test_keyword_rendering() {
        assert_eq!(keyword("RUN", "DEFAULT"), "RUN");
        assert_eq!(keyword("CHECK", "x"), "CHECK-x");
    }
}
