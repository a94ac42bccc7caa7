//! expext: a directive-driven test harness
//!
//! Source files carry their own test instructions in comments. Each `RUN`
//! directive names a shell command; each `CHECK` directive names a line its
//! output must contain. Checks are matched in order with a single forward scan
//! of the output, so later checks can never match above earlier ones.
//!
//! # Directive Syntax
//!
//! ```text
//! // RUN: ./lox %s
//! // CHECK: 3
//! // RUN-err: ./lox --bad
//! // CHECK-err: usage: lox [script]
//! ```
//!
//! # Directives
//!
//! | Directive | Description |
//! |-----------|-------------|
//! | `RUN` | Execute a command, check its output against the `DEFAULT` tag |
//! | `RUN-tag` | Execute a command, check its output against `tag` |
//! | `CHECK` | Expect a line in the output of `DEFAULT` runs |
//! | `CHECK-tag` | Expect a line in the output of `tag` runs |
//!
//! A run that exits nonzero produces no output to match. A run whose tag has
//! no checks is an error. The first failure stops the file.

mod collector;
mod engine;
mod error;
mod exec;
mod matcher;
mod parser;
mod runner;
mod state;

pub use collector::{Collector, RunDirective, Expectation};
pub use engine::Engine;
pub use error::{ScriptError, ErrorKind};
pub use exec::{Shell, ShellConfig, ShellOutput, SystemShell, LaunchFault, EXIT_NOT_FOUND, EXIT_FAULT};
pub use matcher::Matcher;
pub use parser::{Directive, Keyword, CheckKind, parse_directive, resolve_tag, DEFAULT_TAG};
pub use runner::{TestRunner, RunConfig, TestResult, TestCaseResult, TestRunnerBuilder};
pub use state::{Session, RunRecord};

// Convenience functions for cargo test integration
pub use runner::{run_and_assert, run_and_assert_with, run};
