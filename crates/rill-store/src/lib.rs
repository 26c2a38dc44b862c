#![forbid(unsafe_code)]

//! Reducer-driven state store with bounded undo/redo.
//!
//! - [`StateStore`]: the store handle; dispatches [`Action`]s and exposes
//!   state, current value, and undo/redo availability as streams.
//! - [`state_reducer`]: the pure transition function.
//! - [`StoreState`]: one immutable version with its history and future.
//! - [`ShallowMerge`]: how update payloads combine with state.
//! - [`StoreConfig`]: history bound and environment overrides.
//!
//! # Invariants
//!
//! 1. History never holds more than `max_history_length` versions.
//! 2. Any update clears the redo stack.
//! 3. Undo and redo with an empty stack leave the state unchanged.
//! 4. Undoing `k` updates and redoing `k` times restores the same state.
//! 5. A rejected payload leaves the state unchanged and publishes nothing.

pub mod action;
pub mod config;
pub mod error;
pub mod merge;
pub mod reducer;
pub mod state;
pub mod store;

pub use action::Action;
pub use config::StoreConfig;
pub use error::{MergeError, Result, StoreError};
pub use merge::ShallowMerge;
pub use reducer::state_reducer;
pub use state::{DEFAULT_MAX_HISTORY_LENGTH, StoreState};
pub use store::{StateStore, create_state_store};
