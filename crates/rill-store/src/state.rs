#![forbid(unsafe_code)]

//! Versioned store state.
//!
//! # Invariants
//!
//! 1. `history.len() <= max_history_length`.
//! 2. `history` and `future` are ordered most recent first.
//! 3. A `StoreState` is never mutated after construction; transitions build
//!    a new value that shares unchanged structure with the old one.

use im::Vector;

/// Default bound on the undo history.
pub const DEFAULT_MAX_HISTORY_LENGTH: usize = 50;

/// One immutable version of the store: the current value and the stacks
/// around it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<S: Clone> {
    pub(crate) current: S,
    pub(crate) history: Vector<S>,
    pub(crate) future: Vector<S>,
    pub(crate) max_history_length: usize,
}

impl<S: Clone> StoreState<S> {
    /// A fresh state with empty history.
    #[must_use]
    pub fn new(current: S, max_history_length: usize) -> Self {
        Self {
            current,
            history: Vector::new(),
            future: Vector::new(),
            max_history_length,
        }
    }

    #[must_use]
    pub fn current(&self) -> &S {
        &self.current
    }

    /// Earlier versions, most recent first.
    #[must_use]
    pub fn history(&self) -> &Vector<S> {
        &self.history
    }

    /// Undone versions, next redo first.
    #[must_use]
    pub fn future(&self) -> &Vector<S> {
        &self.future
    }

    #[must_use]
    pub fn max_history_length(&self) -> usize {
        self.max_history_length
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}
