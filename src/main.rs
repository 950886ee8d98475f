use std::env;
use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use intcode::{Machine, StdIn, StdOut};
use tracing_subscriber::EnvFilter;

fn run() -> Result<()> {
    let path = env::args().nth(1).context("usage: intcode <program>")?;
    let text = fs::read_to_string(&path).with_context(|| format!("failed to read {}", path))?;
    let program = intcode::parse(&text).with_context(|| format!("failed to parse {}", path))?;
    let mut machine = Machine::new(program, StdIn::new(), StdOut::new());
    machine.execute().context("program failed")?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
