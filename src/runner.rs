//! Test runner
//!
//! Runs many directive files in one go: finds them under a directory, gives
//! each its own [`Session`], and collects pass/fail per file.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use crate::engine::Engine;
use crate::exec::ShellConfig;
use crate::state::Session;

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory searched for directive files, or a single file
    pub dir: PathBuf,
    /// Only run files whose stem contains this string
    pub filter: Option<String>,
    /// Keep the execution log of passing files too
    pub verbose: bool,
    /// File name suffixes that mark directive files
    pub extensions: Vec<String>,
    /// Shell used for RUN commands
    pub shell: ShellConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("testdata"),
            filter: None,
            verbose: false,
            extensions: vec![".test".into()],
            shell: ShellConfig::default(),
        }
    }
}

impl RunConfig {
    fn accepts(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if !self.extensions.iter().any(|ext| file_name.ends_with(ext.as_str())) {
            return false;
        }
        match self.filter {
            Some(ref filter) => stem(path).contains(filter.as_str()),
            None => true,
        }
    }
}

fn stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("unknown")
}

/// Outcome of one directive file
#[derive(Debug)]
pub struct TestCaseResult {
    /// File stem
    pub name: String,
    pub file: PathBuf,
    /// Every expectation of every run matched
    pub passed: bool,
    /// Diagnostic line of the first failure
    pub error: Option<String>,
    /// RUN directives executed before finishing or failing
    pub runs: usize,
    /// Execution log; empty for passing files unless verbose
    pub log: String,
    pub duration: Duration,
}

/// Outcome of a whole directory
#[derive(Debug)]
pub struct TestResult {
    pub cases: Vec<TestCaseResult>,
    pub duration: Duration,
}

impl TestResult {
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn passed_count(&self) -> usize {
        self.cases.len() - self.failed_count()
    }

    pub fn failed_count(&self) -> usize {
        self.cases.iter().filter(|c| !c.passed).count()
    }

    /// One-line tally, e.g. `3 passed, 1 failed (12ms)`
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed ({}ms)",
            self.passed_count(),
            self.failed_count(),
            self.duration.as_millis(),
        )
    }
}

/// Runs every directive file under a directory
pub struct TestRunner {
    engine: Engine,
    config: RunConfig,
}

impl TestRunner {
    /// Runner whose engine uses `config.shell`
    pub fn new(config: RunConfig) -> Self {
        Self {
            engine: Engine::with_config(config.shell.clone()),
            config,
        }
    }

    /// Runner with a caller-supplied engine; `config.shell` is ignored
    pub fn with_engine(engine: Engine, config: RunConfig) -> Self {
        Self { engine, config }
    }

    /// Directive files to run, sorted by path
    pub fn discover(&self) -> Result<Vec<PathBuf>, std::io::Error> {
        let root = &self.config.dir;
        if root.is_file() {
            return Ok(vec![root.clone()]);
        }
        if !root.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("test directory not found: {}", root.display()),
            ));
        }

        let mut found = Vec::new();
        let mut pending = vec![root.clone()];
        while let Some(dir) = pending.pop() {
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    pending.push(path);
                } else if self.config.accepts(&path) {
                    found.push(path);
                }
            }
        }
        found.sort();
        Ok(found)
    }

    /// Number of files `run_all` would execute
    pub fn count_tests(&self) -> Result<usize, std::io::Error> {
        self.discover().map(|files| files.len())
    }

    pub fn run_all(&self) -> Result<TestResult, std::io::Error> {
        let start = Instant::now();
        let cases = self
            .discover()?
            .iter()
            .map(|file| self.run_one(file))
            .collect();
        Ok(TestResult {
            cases,
            duration: start.elapsed(),
        })
    }

    /// Run one file. Never fails; problems are reported on the result.
    pub fn run_one(&self, file: &Path) -> TestCaseResult {
        let start = Instant::now();
        let mut session = Session::new();
        let outcome = self.engine.execute_file(&mut session, file);
        let passed = outcome.is_ok();

        TestCaseResult {
            name: stem(file).to_string(),
            file: file.to_path_buf(),
            passed,
            error: outcome.err().map(|e| e.to_string()),
            runs: session.runs.len(),
            log: if passed && !self.config.verbose {
                String::new()
            } else {
                session.log
            },
            duration: start.elapsed(),
        }
    }
}

/// Fluent construction of a [`TestRunner`]
pub struct TestRunnerBuilder {
    config: RunConfig,
    engine: Option<Engine>,
}

impl TestRunnerBuilder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            config: RunConfig {
                dir: dir.into(),
                ..Default::default()
            },
            engine: None,
        }
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.config.filter = Some(filter.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn extensions(mut self, exts: Vec<String>) -> Self {
        self.config.extensions = exts;
        self
    }

    pub fn shell(mut self, shell: ShellConfig) -> Self {
        self.config.shell = shell;
        self
    }

    /// Replace the engine built from the shell config
    pub fn engine(mut self, engine: Engine) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn build(self) -> TestRunner {
        match self.engine {
            Some(engine) => TestRunner::with_engine(engine, self.config),
            None => TestRunner::new(self.config),
        }
    }

    pub fn run(self) -> Result<TestResult, std::io::Error> {
        self.build().run_all()
    }
}

/// Shorthand for [`TestRunnerBuilder::new`]
pub fn run(dir: impl Into<PathBuf>) -> TestRunnerBuilder {
    TestRunnerBuilder::new(dir)
}

/// Run directive files from a `#[test]`, panicking if any fails.
///
/// ```rust,ignore
/// #[test]
/// fn directive_files() {
///     expext::run_and_assert("tests/testdata");
/// }
/// ```
///
/// Set `EXPEXT_VERBOSE` to print logs of passing files too.
pub fn run_and_assert(dir: impl Into<PathBuf>) {
    run_and_assert_with(dir, |_| {});
}

/// Like `run_and_assert` but lets the caller adjust the config first.
pub fn run_and_assert_with(dir: impl Into<PathBuf>, customize: impl FnOnce(&mut RunConfig)) {
    let mut config = RunConfig {
        dir: dir.into(),
        verbose: std::env::var("EXPEXT_VERBOSE").is_ok(),
        ..Default::default()
    };
    customize(&mut config);

    let result = TestRunner::new(config).run_all().expect("failed to run tests");

    for case in &result.cases {
        match case.error {
            None => eprintln!("PASS  {} ({}ms)", case.name, case.duration.as_millis()),
            Some(ref err) => eprintln!("FAIL  {}\n  {}", case.name, err),
        }
        if !case.log.is_empty() {
            eprintln!("  --- log ---");
            for line in case.log.lines() {
                eprintln!("  {}", line);
            }
        }
    }
    eprintln!("\n{}", result.summary());

    if !result.all_passed() {
        panic!("{} test(s) failed", result.failed_count());
    }
}
