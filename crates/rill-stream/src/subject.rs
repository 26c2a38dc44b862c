#![forbid(unsafe_code)]

//! Hot, multicast sources driven imperatively.
//!
//! A [`Subject`] is the entry point for event producers that exist
//! independently of any subscriber (DOM events, timers, a store's state).
//! Every subscriber sees the values pushed after it subscribed, in push
//! order. A subject created with [`Subject::with_value`] also remembers the
//! latest value and replays it to each new subscriber right after `Start`.
//!
//! Subscribers are notified in registration order. A subscriber removed while
//! a value is being fanned out does not receive that value.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::error::StreamError;
use crate::signal::Signal;
use crate::sink::{Sink, Talkback};
use crate::source::Source;

#[derive(Debug, Clone)]
enum Terminal {
    End,
    Error(StreamError),
}

impl Terminal {
    fn signal<T>(self) -> Signal<T> {
        match self {
            Self::End => Signal::End,
            Self::Error(error) => Signal::Error(error),
        }
    }
}

struct SubjectInner<T> {
    sinks: RefCell<Vec<(u64, Sink<T>)>>,
    next_id: Cell<u64>,
    remember: bool,
    latest: RefCell<Option<T>>,
    terminal: RefCell<Option<Terminal>>,
}

impl<T: Clone + 'static> SubjectInner<T> {
    fn contains(&self, id: u64) -> bool {
        self.sinks.borrow().iter().any(|(sid, _)| *sid == id)
    }

    fn detach(&self, id: u64) {
        self.sinks.borrow_mut().retain(|(sid, _)| *sid != id);
        trace!(
            subscriber = id,
            remaining = self.sinks.borrow().len(),
            "subject subscriber removed"
        );
    }

    fn attach(inner: &Rc<Self>, sink: Sink<T>) {
        let terminal = inner.terminal.borrow().clone();
        if let Some(terminal) = terminal {
            sink.send(Signal::Start(Talkback::inert()));
            sink.send(terminal.signal());
            return;
        }

        let id = inner.next_id.get();
        inner.next_id.set(id + 1);
        inner.sinks.borrow_mut().push((id, sink.clone()));

        let weak = Rc::downgrade(inner);
        sink.send(Signal::Start(Talkback::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.detach(id);
            }
        })));

        if inner.contains(id) {
            let latest = inner.latest.borrow().clone();
            if let Some(value) = latest {
                sink.send(Signal::Data(value));
            }
        }
    }

    fn terminate(&self, terminal: Terminal) {
        if self.terminal.borrow().is_some() {
            return;
        }
        *self.terminal.borrow_mut() = Some(terminal.clone());
        let sinks = std::mem::take(&mut *self.sinks.borrow_mut());
        for (_, sink) in sinks {
            sink.send(terminal.clone().signal());
        }
    }
}

/// Imperatively driven multicast source.
///
/// Cloning a `Subject` creates a new handle to the **same** subject.
pub struct Subject<T> {
    inner: Rc<SubjectInner<T>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("subscribers", &self.inner.sinks.borrow().len())
            .field("latest", &self.inner.latest.borrow())
            .field("terminated", &self.inner.terminal.borrow().is_some())
            .finish()
    }
}

impl<T: Clone + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> Subject<T> {
    fn build(remember: bool, latest: Option<T>) -> Self {
        Self {
            inner: Rc::new(SubjectInner {
                sinks: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
                remember,
                latest: RefCell::new(latest),
                terminal: RefCell::new(None),
            }),
        }
    }

    /// A subject without memory.
    #[must_use]
    pub fn new() -> Self {
        Self::build(false, None)
    }

    /// A subject that remembers its latest value, starting from `initial`.
    #[must_use]
    pub fn with_value(initial: T) -> Self {
        Self::build(true, Some(initial))
    }

    /// A source view of this subject.
    #[must_use]
    pub fn source(&self) -> Source<T> {
        let inner = Rc::clone(&self.inner);
        Source::from_fn(move |sink| SubjectInner::attach(&inner, sink))
    }

    /// Push a value to every current subscriber.
    ///
    /// Ignored once the subject has terminated.
    pub fn next(&self, value: T) {
        if self.inner.terminal.borrow().is_some() {
            return;
        }
        if self.inner.remember {
            *self.inner.latest.borrow_mut() = Some(value.clone());
        }
        let targets = self.inner.sinks.borrow().clone();
        for (id, sink) in targets {
            if self.inner.contains(id) {
                sink.send(Signal::Data(value.clone()));
            }
        }
    }

    /// Terminate every subscriber with an error.
    pub fn error(&self, error: StreamError) {
        self.inner.terminate(Terminal::Error(error));
    }

    /// Complete every subscriber.
    pub fn complete(&self) {
        self.inner.terminate(Terminal::End);
    }

    /// The remembered value, if this subject remembers one.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.inner.latest.borrow().clone()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.sinks.borrow().len()
    }

    /// Whether `error` or `complete` has been called.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.inner.terminal.borrow().is_some()
    }
}
