#![forbid(unsafe_code)]

//! Recording helpers for tests of stream-producing code.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::StreamError;
use crate::source::Source;
use crate::subscription::{Observer, Subscription};

/// One observed outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded<T> {
    Data(T),
    Error(StreamError),
    End,
}

/// Subscribes to a source and records everything it delivers.
///
/// The subscription lives as long as the recorder.
#[derive(Debug)]
pub struct Recorder<T> {
    events: Rc<RefCell<Vec<Recorded<T>>>>,
    subscription: Subscription,
}

impl<T: Clone + 'static> Recorder<T> {
    /// Subscribe to `source` and start recording.
    #[must_use]
    pub fn attach(source: &Source<T>) -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let (on_next, on_error, on_complete) =
            (Rc::clone(&events), Rc::clone(&events), Rc::clone(&events));
        let subscription = source.subscribe(
            Observer::new()
                .on_next(move |v| on_next.borrow_mut().push(Recorded::Data(v)))
                .on_error(move |e| on_error.borrow_mut().push(Recorded::Error(e)))
                .on_complete(move || on_complete.borrow_mut().push(Recorded::End)),
        );
        Self {
            events,
            subscription,
        }
    }

    /// Everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<Recorded<T>> {
        self.events.borrow().clone()
    }

    /// Data values recorded so far.
    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Recorded::Data(v) => Some(v.clone()),
                _ => None,
            })
            .collect()
    }

    /// The most recent data value.
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.values().pop()
    }

    /// Whether `End` was recorded.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.events
            .borrow()
            .iter()
            .any(|event| matches!(event, Recorded::End))
    }

    /// The recorded error, if any.
    #[must_use]
    pub fn error(&self) -> Option<StreamError> {
        self.events.borrow().iter().find_map(|event| match event {
            Recorded::Error(e) => Some(e.clone()),
            _ => None,
        })
    }

    /// Clear recorded events, keeping the subscription.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Cancel the underlying subscription.
    pub fn cancel(&self) {
        self.subscription.unsubscribe();
    }
}
