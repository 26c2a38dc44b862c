#![forbid(unsafe_code)]

//! The store handle.
//!
//! A [`StateStore`] owns one [`StoreState`] and republishes it through a
//! remembering [`Subject`] after every dispatch. All derived streams replay
//! the latest state to new subscribers, then follow every transition.
//!
//! Dispatch is synchronous: observers have seen the new state by the time
//! [`StateStore::dispatch`] returns. An action dispatched from inside an
//! observer is queued and applied once the running notification round ends,
//! so every observer sees versions in dispatch order.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use rill_stream::{Source, Subject};
use tracing::{debug, warn};

use crate::action::Action;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::merge::ShallowMerge;
use crate::reducer::state_reducer;
use crate::state::StoreState;

struct StoreInner<S: ShallowMerge> {
    state: RefCell<StoreState<S>>,
    published: Subject<StoreState<S>>,
    queue: RefCell<VecDeque<Action<S::Patch>>>,
    dispatching: Cell<bool>,
    version: Cell<u64>,
}

impl<S: ShallowMerge> StoreInner<S> {
    fn apply(&self, action: Action<S::Patch>) -> Result<()> {
        let kind = action.kind().to_owned();
        let next = {
            let state = self.state.borrow();
            state_reducer(&state, action)
        };
        let next = match next {
            Ok(next) => next,
            Err(error) => {
                warn!(message = "store.dispatch.rejected", action = %kind, %error);
                return Err(error);
            }
        };
        let version = self.version.get() + 1;
        self.version.set(version);
        debug!(
            message = "store.dispatch",
            action = %kind,
            version,
            history = next.history.len(),
            future = next.future.len()
        );
        *self.state.borrow_mut() = next.clone();
        self.published.next(next);
        Ok(())
    }

    fn drain(&self) {
        loop {
            let action = self.queue.borrow_mut().pop_front();
            let Some(action) = action else {
                break;
            };
            if let Err(error) = self.apply(action) {
                debug!(message = "store.dispatch.dropped", %error);
            }
        }
    }
}

/// Cloneable handle to a reducer-driven store with undo/redo.
///
/// Clones share the same state. The store is explicitly constructed and owned
/// by the caller; there is no global instance.
///
/// ```
/// use std::collections::BTreeMap;
/// use rill_store::StateStore;
///
/// let store = StateStore::new(BTreeMap::from([("count", 0)]));
/// let counts = store.select(|state| state.get("count").copied());
/// let _log = counts.for_each(|count| println!("count is now {count:?}"));
///
/// store.update_state(BTreeMap::from([("count", 1)])).unwrap();
/// store.update_state(BTreeMap::from([("count", 2)])).unwrap();
/// store.undo().unwrap();
///
/// assert_eq!(store.snapshot().current(), &BTreeMap::from([("count", 1)]));
/// ```
pub struct StateStore<S: ShallowMerge> {
    inner: Rc<StoreInner<S>>,
}

impl<S: ShallowMerge> Clone for StateStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: ShallowMerge + fmt::Debug> fmt::Debug for StateStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("StateStore")
            .field("current", &state.current)
            .field("history", &state.history.len())
            .field("future", &state.future.len())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

/// Create a store holding `initial`, with an optional history bound
/// (default 50).
#[must_use]
pub fn create_state_store<S: ShallowMerge>(
    initial: S,
    max_history_length: Option<usize>,
) -> StateStore<S> {
    let mut config = StoreConfig::default();
    if let Some(max) = max_history_length {
        config = config.with_max_history_length(max);
    }
    StateStore::with_config(initial, config)
}

impl<S: ShallowMerge> StateStore<S> {
    /// A store with the default configuration.
    #[must_use]
    pub fn new(initial: S) -> Self {
        Self::with_config(initial, StoreConfig::default())
    }

    #[must_use]
    pub fn with_config(initial: S, config: StoreConfig) -> Self {
        let state = StoreState::new(initial, config.max_history_length);
        debug!(
            message = "store.created",
            max_history_length = config.max_history_length
        );
        Self {
            inner: Rc::new(StoreInner {
                published: Subject::with_value(state.clone()),
                state: RefCell::new(state),
                queue: RefCell::new(VecDeque::new()),
                dispatching: Cell::new(false),
                version: Cell::new(0),
            }),
        }
    }

    // ─── Streams ─────────────────────────────────────────────────────────

    /// Every state version (`state$`).
    #[must_use]
    pub fn state(&self) -> Source<StoreState<S>> {
        self.inner.published.source()
    }

    /// The current value of every version (`current$`).
    #[must_use]
    pub fn current(&self) -> Source<S> {
        self.state().map(|state| state.current)
    }

    /// Whether undo is possible, for every version (`canUndo$`).
    #[must_use]
    pub fn can_undo(&self) -> Source<bool> {
        self.state().map(|state| state.can_undo())
    }

    /// Whether redo is possible, for every version (`canRedo$`).
    #[must_use]
    pub fn can_redo(&self) -> Source<bool> {
        self.state().map(|state| state.can_redo())
    }

    /// A derived view of the current value, emitted only when it changes.
    #[must_use]
    pub fn select<U>(&self, selector: impl Fn(&S) -> U + 'static) -> Source<U>
    where
        U: Clone + PartialEq + 'static,
    {
        self.state()
            .map(move |state| selector(&state.current))
            .distinct_until_changed()
    }

    // ─── Reads ───────────────────────────────────────────────────────────

    /// The latest state version.
    #[must_use]
    pub fn snapshot(&self) -> StoreState<S> {
        self.inner.state.borrow().clone()
    }

    /// How many transitions have been applied.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    // ─── Dispatch ────────────────────────────────────────────────────────

    /// Apply one action and notify observers.
    ///
    /// Called from inside an observer, the action is queued and `Ok(())` is
    /// returned right away; a queued action that fails is logged and dropped.
    pub fn dispatch(&self, action: Action<S::Patch>) -> Result<()> {
        if self.inner.dispatching.get() {
            debug!(message = "store.dispatch.queued", action = action.kind());
            self.inner.queue.borrow_mut().push_back(action);
            return Ok(());
        }
        self.inner.dispatching.set(true);
        let result = self.inner.apply(action);
        self.inner.drain();
        self.inner.dispatching.set(false);
        result
    }

    pub fn update_state(&self, patch: S::Patch) -> Result<()> {
        self.dispatch(Action::UpdateState(patch))
    }

    pub fn reset_state(&self) -> Result<()> {
        self.dispatch(Action::ResetState)
    }

    pub fn undo(&self) -> Result<()> {
        self.dispatch(Action::Undo)
    }

    pub fn redo(&self) -> Result<()> {
        self.dispatch(Action::Redo)
    }
}
