#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Environment variables (`RILL_DEMO_*`) override defaults; explicit flags
//! override both.

use std::env;

use serde_json::{Value, json};
use thiserror::Error;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
rill-demo: drive an undoable state store from stdin

USAGE:
    rill-demo [OPTIONS]

OPTIONS:
    --max-history=N    Undo history bound (default: RILL_MAX_HISTORY or 50)
    --initial=JSON     Initial state object (default: {\"count\": 0})
    --help, -h         Show this help message
    --version, -V      Show version

COMMANDS (one per line):
    set JSON           Merge a JSON object into the current state
    dispatch JSON      Dispatch a raw action, e.g. {\"type\": \"UNDO\"}
    undo / redo        Step through history
    reset              Reset to an empty state
    show               Print the current state and stack sizes
    help               Show commands
    quit               Exit

ENVIRONMENT VARIABLES:
    RILL_DEMO_MAX_HISTORY  Override --max-history
    RILL_DEMO_INITIAL      Override --initial
    RILL_MAX_HISTORY       Store default history bound
    RILL_LOG               Log filter, e.g. rill_store=debug (default: warn)";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid {flag} value: {value}")]
    InvalidValue { flag: &'static str, value: String },

    #[error("unknown argument: {0} (run with --help for usage)")]
    UnknownArgument(String),

    #[error("unknown command: {0} (type `help`)")]
    UnknownCommand(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(#[from] rill_store::StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// History bound; `None` defers to the store configuration.
    pub max_history: Option<usize>,
    /// Initial state.
    pub initial: Value,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            max_history: None,
            initial: json!({"count": 0}),
        }
    }
}

/// What the process should do after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse the process environment and arguments.
    pub fn parse() -> Result<Invocation, CliError> {
        Self::parse_from(|key| env::var(key).ok(), env::args().skip(1))
    }

    /// Parse from an explicit environment lookup and argument list.
    ///
    /// Unparseable environment values are ignored; unparseable flags are
    /// errors.
    pub fn parse_from(
        lookup: impl Fn(&str) -> Option<String>,
        args: impl IntoIterator<Item = String>,
    ) -> Result<Invocation, CliError> {
        let mut opts = Self::default();

        if let Some(val) = lookup("RILL_DEMO_MAX_HISTORY")
            && let Ok(n) = val.trim().parse()
        {
            opts.max_history = Some(n);
        }
        if let Some(val) = lookup("RILL_DEMO_INITIAL")
            && let Ok(initial) = serde_json::from_str(&val)
        {
            opts.initial = initial;
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Invocation::Help),
                "--version" | "-V" => return Ok(Invocation::Version),
                other => {
                    if let Some(val) = other.strip_prefix("--max-history=") {
                        let n = val.parse().map_err(|_| CliError::InvalidValue {
                            flag: "--max-history",
                            value: val.to_owned(),
                        })?;
                        opts.max_history = Some(n);
                    } else if let Some(val) = other.strip_prefix("--initial=") {
                        opts.initial =
                            serde_json::from_str(val).map_err(|_| CliError::InvalidValue {
                                flag: "--initial",
                                value: val.to_owned(),
                            })?;
                    } else {
                        return Err(CliError::UnknownArgument(other.to_owned()));
                    }
                }
            }
        }

        Ok(Invocation::Run(opts))
    }
}
