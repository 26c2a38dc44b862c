#![forbid(unsafe_code)]

//! Errors carried by terminal [`Signal::Error`](crate::Signal::Error) signals.

use std::fmt::Display;

use thiserror::Error;

/// Result alias for producers and fallible stream callbacks.
pub type Result<T> = std::result::Result<T, StreamError>;

/// Why a stream terminated abnormally.
///
/// Errors are values: they travel downstream inside a terminal signal and are
/// never raised to the caller of `connect`/`subscribe`. They are `Clone` so a
/// multicast source can hand the same error to every sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// A producer failed while starting or emitting.
    #[error("producer error: {0}")]
    Producer(String),
    /// A `try_map`/`try_filter` callback returned an error.
    #[error("transform error: {0}")]
    Transform(String),
    /// The promise behind `from_promise` was rejected.
    #[error("promise rejected: {0}")]
    Rejected(String),
}

impl StreamError {
    /// Producer failure with the given reason.
    #[must_use]
    pub fn producer(reason: impl Display) -> Self {
        Self::Producer(reason.to_string())
    }

    /// Transform failure with the given reason.
    #[must_use]
    pub fn transform(reason: impl Display) -> Self {
        Self::Transform(reason.to_string())
    }

    /// Promise rejection with the given reason.
    #[must_use]
    pub fn rejected(reason: impl Display) -> Self {
        Self::Rejected(reason.to_string())
    }
}
