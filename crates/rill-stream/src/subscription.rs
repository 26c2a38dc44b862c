#![forbid(unsafe_code)]

//! Observer-style subscriptions with RAII cancellation.
//!
//! [`Source::subscribe`] hides the talkback behind a [`Subscription`] guard.
//! Dropping the guard cancels the subscription; [`Subscription::detach`]
//! lets it run until the source terminates on its own.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::StreamError;
use crate::signal::Signal;
use crate::sink::{Sink, Talkback};
use crate::source::Source;

type Callback<T> = Box<dyn Fn(T)>;

/// Callbacks for the three observable outcomes of a stream.
pub struct Observer<T> {
    next: Option<Callback<T>>,
    error: Option<Callback<StreamError>>,
    complete: Option<Box<dyn Fn()>>,
}

impl<T> Default for Observer<T> {
    fn default() -> Self {
        Self {
            next: None,
            error: None,
            complete: None,
        }
    }
}

impl<T> fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("next", &self.next.is_some())
            .field("error", &self.error.is_some())
            .field("complete", &self.complete.is_some())
            .finish()
    }
}

impl<T> Observer<T> {
    /// An observer that ignores everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called for every value.
    #[must_use]
    pub fn on_next(mut self, f: impl Fn(T) + 'static) -> Self {
        self.next = Some(Box::new(f));
        self
    }

    /// Called once if the stream fails.
    #[must_use]
    pub fn on_error(mut self, f: impl Fn(StreamError) + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    /// Called once if the stream completes.
    #[must_use]
    pub fn on_complete(mut self, f: impl Fn() + 'static) -> Self {
        self.complete = Some(Box::new(f));
        self
    }
}

#[derive(Default)]
struct SubscriptionState {
    talkback: RefCell<Option<Talkback>>,
    closed: Cell<bool>,
}

impl SubscriptionState {
    /// Mark closed and release the talkback. Returns false if already closed.
    fn close(&self) -> bool {
        if self.closed.replace(true) {
            return false;
        }
        let talkback = self.talkback.borrow_mut().take();
        drop(talkback);
        true
    }

    fn cancel(&self) {
        if self.closed.replace(true) {
            return;
        }
        let talkback = self.talkback.borrow_mut().take();
        if let Some(talkback) = talkback {
            talkback.end();
        }
    }
}

/// Guard for an active subscription.
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    state: Rc<SubscriptionState>,
    detached: bool,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.state.closed.get())
            .field("detached", &self.detached)
            .finish()
    }
}

impl Subscription {
    /// Cancel now. Idempotent.
    pub fn unsubscribe(&self) {
        self.state.cancel();
    }

    /// Whether the stream terminated or the subscription was cancelled.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.closed.get()
    }

    /// Drop the guard without cancelling.
    pub fn detach(mut self) {
        self.detached = true;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.detached {
            self.state.cancel();
        }
    }
}

impl<T: 'static> Source<T> {
    /// Subscribe with an [`Observer`].
    pub fn subscribe(&self, observer: Observer<T>) -> Subscription {
        let state = Rc::new(SubscriptionState::default());
        let s = Rc::clone(&state);
        self.connect(Sink::new(move |signal| match signal {
            Signal::Start(talkback) => {
                if s.closed.get() {
                    talkback.end();
                } else {
                    *s.talkback.borrow_mut() = Some(talkback);
                }
            }
            Signal::Data(value) => {
                if !s.closed.get()
                    && let Some(next) = &observer.next
                {
                    next(value);
                }
            }
            Signal::Error(error) => {
                if s.close()
                    && let Some(on_error) = &observer.error
                {
                    on_error(error);
                }
            }
            Signal::End => {
                if s.close()
                    && let Some(complete) = &observer.complete
                {
                    complete();
                }
            }
        }));
        Subscription {
            state,
            detached: false,
        }
    }

    /// Subscribe to values only.
    pub fn for_each(&self, f: impl Fn(T) + 'static) -> Subscription {
        self.subscribe(Observer::new().on_next(f))
    }
}
