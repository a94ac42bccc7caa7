//! Shell command execution
//!
//! Runs one RUN command through the system shell and captures its exit code
//! and trimmed output. Launch failures never escape as errors; they become a
//! synthetic [`ShellOutput`] with a sentinel exit code.

use std::path::PathBuf;
use std::process::{Command as ProcessCommand, Stdio};

/// Exit code reported when the shell itself cannot be found
pub const EXIT_NOT_FOUND: i32 = 127;

/// Exit code reported for any other execution fault
pub const EXIT_FAULT: i32 = 1;

/// Captured result of one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    pub code: i32,
    /// Stdout, trimmed
    pub stdout: String,
    /// Stderr, trimmed
    pub stderr: String,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Stdout split on `\n`, or `None` when the command exited nonzero.
    pub fn lines(&self) -> Option<Vec<String>> {
        if !self.success() {
            return None;
        }
        Some(self.stdout.split('\n').map(str::to_string).collect())
    }
}

/// Why a command could not be run at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchFault {
    /// The program does not exist
    NotFound,
    /// Anything else (permissions, resource limits, pipe errors)
    Other,
}

impl LaunchFault {
    pub fn classify(err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => LaunchFault::NotFound,
            _ => LaunchFault::Other,
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            LaunchFault::NotFound => EXIT_NOT_FOUND,
            LaunchFault::Other => EXIT_FAULT,
        }
    }

    /// Synthesize the result reported in place of a real run.
    pub fn into_output(self, command: &str, err: &std::io::Error) -> ShellOutput {
        let stderr = match self {
            LaunchFault::NotFound => format!("Error: Command '{}' not found.", command),
            LaunchFault::Other => format!("An unexpected error occurred: {}", err),
        };
        ShellOutput {
            code: self.exit_code(),
            stdout: String::new(),
            stderr,
        }
    }
}

/// Executes command strings.
///
/// The engine only depends on this trait, so tests can substitute a fake.
pub trait Shell {
    fn run(&self, command: &str) -> ShellOutput;
}

/// Which shell runs commands, and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Shell program (`sh` / `cmd`)
    pub program: String,
    /// Flag that makes the shell take a command string (`-c` / `/C`)
    pub flag: String,
    /// Working directory; inherits the harness's when `None`
    pub dir: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        #[cfg(windows)]
        let (program, flag) = ("cmd", "/C");
        #[cfg(not(windows))]
        let (program, flag) = ("sh", "-c");

        Self {
            program: program.into(),
            flag: flag.into(),
            dir: None,
        }
    }
}

/// Runs commands through a real subprocess
#[derive(Debug, Clone, Default)]
pub struct SystemShell {
    config: ShellConfig,
}

impl SystemShell {
    pub fn new(config: ShellConfig) -> Self {
        Self { config }
    }
}

impl Shell for SystemShell {
    fn run(&self, command: &str) -> ShellOutput {
        let mut cmd = ProcessCommand::new(&self.config.program);
        cmd.arg(&self.config.flag).arg(command);
        if let Some(ref dir) = self.config.dir {
            cmd.current_dir(dir);
        }
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        match cmd.output() {
            Ok(output) => ShellOutput {
                // Killed by a signal: no exit code
                code: output.status.code().unwrap_or(EXIT_FAULT),
                stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            },
            Err(e) => LaunchFault::classify(&e).into_output(command, &e),
        }
    }
}
