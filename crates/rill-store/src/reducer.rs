#![forbid(unsafe_code)]

//! The pure transition function behind the store.

use im::Vector;

use crate::action::Action;
use crate::error::Result;
use crate::merge::ShallowMerge;
use crate::state::StoreState;

fn bounded<S: Clone>(mut stack: Vector<S>, max: usize) -> Vector<S> {
    if stack.len() > max {
        stack.truncate(max);
    }
    stack
}

/// Compute the next state for `action`.
///
/// - `UpdateState`: the current value moves onto history (oldest entries
///   beyond the bound are dropped), the payload is merged shallowly, and the
///   future is cleared.
/// - `ResetState`: empty value, empty stacks, same bound.
/// - `Undo` / `Redo`: move one version between the stacks; identity when the
///   source stack is empty.
/// - `Unrecognized`: identity.
///
/// Only a failed merge returns an error; the input state is never modified.
pub fn state_reducer<S: ShallowMerge>(
    state: &StoreState<S>,
    action: Action<S::Patch>,
) -> Result<StoreState<S>> {
    let max = state.max_history_length;
    match action {
        Action::UpdateState(patch) => {
            let current = state.current.merge(patch)?;
            let mut history = state.history.clone();
            history.push_front(state.current.clone());
            Ok(StoreState {
                current,
                history: bounded(history, max),
                future: Vector::new(),
                max_history_length: max,
            })
        }
        Action::ResetState => Ok(StoreState::new(S::empty(), max)),
        Action::Undo => {
            let mut history = state.history.clone();
            let Some(previous) = history.pop_front() else {
                return Ok(state.clone());
            };
            let mut future = state.future.clone();
            future.push_front(state.current.clone());
            Ok(StoreState {
                current: previous,
                history,
                future,
                max_history_length: max,
            })
        }
        Action::Redo => {
            let mut future = state.future.clone();
            let Some(next) = future.pop_front() else {
                return Ok(state.clone());
            };
            let mut history = state.history.clone();
            history.push_front(state.current.clone());
            Ok(StoreState {
                current: next,
                history: bounded(history, max),
                future,
                max_history_length: max,
            })
        }
        Action::Unrecognized(_) => Ok(state.clone()),
    }
}
