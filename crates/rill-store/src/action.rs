#![forbid(unsafe_code)]

//! Store actions.
//!
//! With the `serde` feature an action travels as
//! `{"type": "UPDATE_STATE", "payload": {...}}`. An unknown `type` decodes to
//! [`Action::Unrecognized`], which the reducer ignores.

use std::fmt;

pub const UPDATE_STATE: &str = "UPDATE_STATE";
pub const RESET_STATE: &str = "RESET_STATE";
pub const UNDO: &str = "UNDO";
pub const REDO: &str = "REDO";

/// A requested state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        try_from = "wire::WireAction<P>",
        into = "wire::WireAction<P>",
        bound(
            serialize = "P: serde::Serialize + Clone",
            deserialize = "P: serde::Deserialize<'de>"
        )
    )
)]
pub enum Action<P> {
    /// Merge the payload into the current state, recording history.
    UpdateState(P),
    /// Return to an empty state, dropping history.
    ResetState,
    /// Step back one version.
    Undo,
    /// Step forward one version.
    Redo,
    /// An action type this store does not handle.
    Unrecognized(String),
}

impl<P> Action<P> {
    /// The wire name of this action.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::UpdateState(_) => UPDATE_STATE,
            Self::ResetState => RESET_STATE,
            Self::Undo => UNDO,
            Self::Redo => REDO,
            Self::Unrecognized(kind) => kind,
        }
    }
}

impl<P> fmt::Display for Action<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

#[cfg(feature = "serde")]
mod wire {
    use serde::{Deserialize, Serialize};

    use super::{Action, RESET_STATE, REDO, UNDO, UPDATE_STATE};
    use crate::error::StoreError;

    #[derive(Serialize, Deserialize)]
    pub(super) struct WireAction<P> {
        #[serde(rename = "type")]
        kind: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<P>,
    }

    impl<P> TryFrom<WireAction<P>> for Action<P> {
        type Error = StoreError;

        fn try_from(wire: WireAction<P>) -> Result<Self, Self::Error> {
            Ok(match wire.kind.as_str() {
                UPDATE_STATE => match wire.payload {
                    Some(payload) => Action::UpdateState(payload),
                    None => {
                        return Err(StoreError::malformed_action(
                            "UPDATE_STATE without payload",
                        ));
                    }
                },
                RESET_STATE => Action::ResetState,
                UNDO => Action::Undo,
                REDO => Action::Redo,
                _ => Action::Unrecognized(wire.kind),
            })
        }
    }

    impl<P> From<Action<P>> for WireAction<P> {
        fn from(action: Action<P>) -> Self {
            let kind = action.kind().to_owned();
            let payload = match action {
                Action::UpdateState(payload) => Some(payload),
                _ => None,
            };
            Self { kind, payload }
        }
    }
}
