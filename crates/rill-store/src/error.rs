#![forbid(unsafe_code)]

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// A payload that cannot be merged into the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("payload must be an object, got {found}")]
    PayloadNotObject { found: &'static str },

    #[error("state must be an object, got {found}")]
    StateNotObject { found: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("cannot merge payload: {0}")]
    Merge(#[from] MergeError),

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("malformed action: {message}")]
    MalformedAction { message: String },
}

impl StoreError {
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn malformed_action(message: impl Into<String>) -> Self {
        Self::MalformedAction {
            message: message.into(),
        }
    }
}
