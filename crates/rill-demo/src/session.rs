#![forbid(unsafe_code)]

//! A line-driven session over a JSON state store.
//!
//! Output is produced by stream subscriptions, not by the commands
//! themselves: every state change reaches the `current` and toolbar
//! subscriptions, which append lines to the session transcript.

use std::cell::RefCell;
use std::rc::Rc;

use rill_store::{Action, StateStore, StoreConfig};
use rill_stream::Subscription;
use serde_json::Value;

use crate::cli::CliError;

pub const COMMANDS: &str = "\
set JSON | dispatch JSON | undo | redo | reset | show | help | quit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set(Value),
    Dispatch(Action<Value>),
    Undo,
    Redo,
    Reset,
    Show,
    Help,
    Quit,
    Nothing,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CliError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        Ok(match word {
            "" => Self::Nothing,
            "set" | "merge" => Self::Set(serde_json::from_str(rest)?),
            "dispatch" => Self::Dispatch(serde_json::from_str(rest)?),
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            "reset" => Self::Reset,
            "show" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CliError::UnknownCommand(other.to_owned())),
        })
    }
}

/// Whether the session continues after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    store: StateStore<Value>,
    transcript: Rc<RefCell<Vec<String>>>,
    _subscriptions: Vec<Subscription>,
}

impl Session {
    pub fn new(initial: Value, config: StoreConfig) -> Self {
        let store = StateStore::with_config(initial, config);
        let transcript = Rc::new(RefCell::new(Vec::new()));

        let out = Rc::clone(&transcript);
        let current = store
            .current()
            .for_each(move |value| out.borrow_mut().push(format!("current: {value}")));

        let out = Rc::clone(&transcript);
        // Both flags must be read from the same state version.
        let toolbar = store
            .state()
            .map(|state| (state.can_undo(), state.can_redo()))
            .distinct_until_changed()
            .for_each(move |(undo, redo)| {
                out.borrow_mut()
                    .push(format!("undo: {} redo: {}", yes_no(undo), yes_no(redo)));
            });

        Self {
            store,
            transcript,
            _subscriptions: vec![current, toolbar],
        }
    }

    pub fn execute(&self, command: Command) -> Result<Flow, CliError> {
        match command {
            Command::Set(patch) => self.store.update_state(patch)?,
            Command::Dispatch(action) => self.store.dispatch(action)?,
            Command::Undo => self.store.undo()?,
            Command::Redo => self.store.redo()?,
            Command::Reset => self.store.reset_state()?,
            Command::Show => {
                let snapshot = self.store.snapshot();
                self.say(format!(
                    "current: {} (history {}/{}, future {})",
                    snapshot.current(),
                    snapshot.history().len(),
                    snapshot.max_history_length(),
                    snapshot.future().len()
                ));
            }
            Command::Help => self.say(COMMANDS.to_owned()),
            Command::Quit => return Ok(Flow::Quit),
            Command::Nothing => {}
        }
        Ok(Flow::Continue)
    }

    /// Lines produced since the last call.
    pub fn take_output(&self) -> Vec<String> {
        std::mem::take(&mut *self.transcript.borrow_mut())
    }

    fn say(&self, line: String) {
        self.transcript.borrow_mut().push(line);
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
