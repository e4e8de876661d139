use std::{
    io::{stdin, stdout, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;

use frontend::{Frontend, Options, RunError};

/// Exit status of a file run that reported any diagnostic.
const DIAGNOSTICS_EXIT_CODE: u8 = 255;

/// Scans and parses an expression, printing its tokens and syntax tree.
#[derive(clap::Parser)]
struct Args {
    /// File to run. Starts an interactive prompt when omitted.
    file: Option<PathBuf>,

    /// Don't print the scanned tokens.
    #[arg(long)]
    no_tokens: bool,
}

fn run_file(path: PathBuf, frontend: &Frontend) -> anyhow::Result<ExitCode> {
    log::debug!("Running {}", path.display());
    let source = std::fs::read_to_string(path)?;
    match frontend.run_source(&source, &mut stdout()) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(RunError::Diagnostics(diagnostics)) => {
            eprintln!("{diagnostics}");
            Ok(ExitCode::from(DIAGNOSTICS_EXIT_CODE))
        }
        Err(RunError::Io(e)) => Err(e.into()),
    }
}

fn run_prompt(frontend: &Frontend) -> anyhow::Result<ExitCode> {
    loop {
        print!("> ");
        stdout().flush()?;

        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 || line.trim() == "q" {
            return Ok(ExitCode::SUCCESS);
        }

        let line = line.trim_end_matches(&['\r', '\n'][..]);
        match frontend.run_source(line, &mut stdout()) {
            Ok(()) => (),
            Err(RunError::Diagnostics(diagnostics)) => eprintln!("{diagnostics}"),
            Err(RunError::Io(e)) => return Err(e.into()),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let frontend = Frontend::new(Options { print_tokens: !args.no_tokens });

    match args.file {
        Some(file) => run_file(file, &frontend),
        None => run_prompt(&frontend),
    }
}
