#![forbid(unsafe_code)]

//! Store configuration.
//!
//! Defaults can be overridden from the environment:
//!
//! - `RILL_MAX_HISTORY`: undo history bound (non-negative integer).

use std::env;

use crate::error::{Result, StoreError};
use crate::state::DEFAULT_MAX_HISTORY_LENGTH;

pub const MAX_HISTORY_ENV: &str = "RILL_MAX_HISTORY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// How many earlier versions `UNDO` can reach.
    pub max_history_length: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_history_length: DEFAULT_MAX_HISTORY_LENGTH,
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_history_length(mut self, max_history_length: usize) -> Self {
        self.max_history_length = max_history_length;
        self
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_value(env::var(MAX_HISTORY_ENV).ok().as_deref())
    }

    /// Apply a raw `RILL_MAX_HISTORY` value. `None` keeps the current bound.
    pub fn with_env_value(self, raw: Option<&str>) -> Result<Self> {
        match raw {
            None => Ok(self),
            Some(raw) => Ok(self.with_max_history_length(parse_max_history(raw)?)),
        }
    }
}

/// Parse a history bound.
pub fn parse_max_history(raw: &str) -> Result<usize> {
    raw.trim().parse().map_err(|err| {
        StoreError::invalid_config(format!("{MAX_HISTORY_ENV}={raw:?}: {err}"))
    })
}
