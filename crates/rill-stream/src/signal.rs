#![forbid(unsafe_code)]

//! The protocol message exchanged between a source and its sink.
//!
//! A channel always opens with exactly one [`Signal::Start`], carries any
//! number of [`Signal::Data`], and closes with at most one terminal signal
//! ([`Signal::Error`] or [`Signal::End`]). Nothing is delivered after the
//! terminal signal, and nothing at all after the sink ends the talkback.

use crate::error::StreamError;
use crate::sink::Talkback;

/// One message of the source/sink protocol.
#[derive(Debug)]
pub enum Signal<T> {
    /// Channel negotiation. The talkback lets the sink request termination.
    Start(Talkback),
    /// One payload value.
    Data(T),
    /// Abnormal termination.
    Error(StreamError),
    /// Normal completion.
    End,
}

impl<T> Signal<T> {
    /// Whether this signal closes the channel.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Error(_) | Self::End)
    }

    /// Short name used in log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Start(_) => "start",
            Self::Data(_) => "data",
            Self::Error(_) => "error",
            Self::End => "end",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_error_and_end_are_terminal() {
        assert!(!Signal::<u8>::Start(Talkback::inert()).is_terminal());
        assert!(!Signal::Data(1u8).is_terminal());
        assert!(Signal::<u8>::Error(StreamError::producer("x")).is_terminal());
        assert!(Signal::<u8>::End.is_terminal());
    }

    #[test]
    fn kind_names() {
        assert_eq!(Signal::Data(0u8).kind(), "data");
        assert_eq!(Signal::<u8>::End.kind(), "end");
    }
}
