#![forbid(unsafe_code)]

//! Interactive demo: reads commands from stdin and prints every state the
//! store publishes.

mod cli;
mod session;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use rill_store::StoreConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::{CliError, HELP_TEXT, Invocation, Opts, VERSION};
use crate::session::{Command, Flow, Session};

fn init_logging() {
    let filter = EnvFilter::try_from_env("RILL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(opts: Opts) -> Result<(), CliError> {
    let mut config = StoreConfig::from_env()?;
    if let Some(max) = opts.max_history {
        config = config.with_max_history_length(max);
    }
    tracing::info!(
        message = "demo.start",
        max_history_length = config.max_history_length
    );

    let session = Session::new(opts.initial, config);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in session.take_output() {
        writeln!(out, "{line}")?;
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        let flow = Command::parse(&line).and_then(|command| session.execute(command));
        for line in session.take_output() {
            writeln!(out, "{line}")?;
        }
        match flow {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => writeln!(out, "error: {err}")?,
        }
        out.flush()?;
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let invocation = match Opts::parse() {
        Ok(invocation) => invocation,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };
    match invocation {
        Invocation::Help => println!("{HELP_TEXT}"),
        Invocation::Version => println!("rill-demo {VERSION}"),
        Invocation::Run(opts) => {
            if let Err(err) = run(opts) {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
