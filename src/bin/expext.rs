//! expext CLI
//!
//! Run the RUN/CHECK directives embedded in one source file.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use expext::{Collector, Engine, Session, ShellConfig};

#[derive(Parser, Debug)]
#[command(name = "expext")]
#[command(version)]
#[command(about = "Run RUN directives from a source file and verify their output against CHECK directives")]
struct Cli {
    /// Source file containing the directives
    file: PathBuf,

    /// Verbose output: show the execution log on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Do not echo directives in the execution log
    #[arg(short, long)]
    quiet: bool,

    /// Shell program used to run commands [default: sh, cmd on Windows]
    #[arg(long)]
    shell: Option<String>,

    /// Flag passing the command string to the shell [default: -c, /C on Windows]
    #[arg(long = "shell-flag", allow_hyphen_values = true)]
    shell_flag: Option<String>,

    /// Working directory for commands
    #[arg(short = 'C', long = "dir")]
    dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every expectation matched. Errors are file-access failures.
fn run(cli: &Cli) -> anyhow::Result<bool> {
    let collector = Collector::open(&cli.file)?;

    let mut shell = ShellConfig::default();
    if let Some(ref program) = cli.shell {
        shell.program = program.clone();
    }
    if let Some(ref flag) = cli.shell_flag {
        shell.flag = flag.clone();
    }
    shell.dir = cli.dir.clone();

    let mut engine = Engine::with_config(shell);
    engine.quiet = cli.quiet;

    let mut session = Session::new();
    let result = engine.execute(&mut session, &collector);

    if cli.verbose {
        for line in session.log.lines() {
            eprintln!("{}", line);
        }
    }

    match result {
        Ok(()) => Ok(true),
        Err(e) => {
            println!("{}", e);
            Ok(false)
        }
    }
}
