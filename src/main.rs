//! speak CLI entry point.

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use speak::cli::{CommandLine, Invocation, parse_command_line};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let (invocation, verbose) = match parse_command_line(std::env::args_os()) {
        CommandLine::Run {
            invocation,
            verbose,
        } => (invocation, verbose),
        CommandLine::Informational(text) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
        CommandLine::Usage(text) => {
            println!("{text}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(verbose);

    match execute(&invocation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; stdout carries the voice list and error lines.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "speak=debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

#[cfg(windows)]
fn execute(invocation: &Invocation) -> Result<()> {
    use anyhow::Context;
    use speak::backend::{ComSession, SapiBackend};

    let session = ComSession::initialize().context("Failed initializing COM")?;
    let backend = SapiBackend::new(&session).context("Failed creating SAPI voice")?;

    speak::cli::run(&backend, invocation, &mut io::stdout().lock())?;
    Ok(())
}

#[cfg(not(windows))]
fn execute(_invocation: &Invocation) -> Result<()> {
    anyhow::bail!("Failed initializing speech subsystem: SAPI is only available on Windows")
}
