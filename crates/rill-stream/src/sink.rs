#![forbid(unsafe_code)]

//! Sinks and the talkback channel handed to them at `Start`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::signal::Signal;

/// Consumer callback receiving [`Signal`]s.
///
/// Cloning a `Sink` creates another handle to the **same** callback. The
/// callback is `Fn`; sinks that accumulate state keep it in `Cell`/`RefCell`
/// so re-entrant delivery never trips a borrow.
pub struct Sink<T> {
    deliver: Rc<dyn Fn(Signal<T>)>,
}

impl<T> Clone for Sink<T> {
    fn clone(&self) -> Self {
        Self {
            deliver: Rc::clone(&self.deliver),
        }
    }
}

impl<T> fmt::Debug for Sink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").finish_non_exhaustive()
    }
}

impl<T: 'static> Sink<T> {
    /// Wrap a callback.
    #[must_use]
    pub fn new(deliver: impl Fn(Signal<T>) + 'static) -> Self {
        Self {
            deliver: Rc::new(deliver),
        }
    }

    /// Deliver one signal.
    pub fn send(&self, signal: Signal<T>) {
        (self.deliver)(signal);
    }
}

struct TalkbackInner {
    ended: Cell<bool>,
    on_end: RefCell<Option<Box<dyn FnOnce()>>>,
}

/// Back-channel given to a sink with [`Signal::Start`].
///
/// Calling [`end`](Talkback::end) asks the source to stop. The upstream
/// cleanup runs on the first call only; later calls (from any clone) are
/// no-ops.
#[derive(Clone)]
pub struct Talkback {
    inner: Rc<TalkbackInner>,
}

impl fmt::Debug for Talkback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Talkback")
            .field("ended", &self.inner.ended.get())
            .finish()
    }
}

impl Talkback {
    /// Create a talkback that runs `on_end` the first time it is ended.
    #[must_use]
    pub fn new(on_end: impl FnOnce() + 'static) -> Self {
        Self {
            inner: Rc::new(TalkbackInner {
                ended: Cell::new(false),
                on_end: RefCell::new(Some(Box::new(on_end))),
            }),
        }
    }

    /// A talkback with nothing upstream to cancel.
    #[must_use]
    pub fn inert() -> Self {
        Self {
            inner: Rc::new(TalkbackInner {
                ended: Cell::new(false),
                on_end: RefCell::new(None),
            }),
        }
    }

    /// Request termination of the channel.
    pub fn end(&self) {
        if self.inner.ended.replace(true) {
            return;
        }
        let on_end = self.inner.on_end.borrow_mut().take();
        if let Some(on_end) = on_end {
            on_end();
        }
    }

    /// Whether [`end`](Talkback::end) has been called on any clone.
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.inner.ended.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_runs_callback_once_across_clones() {
        let calls = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&calls);
        let talkback = Talkback::new(move || c.set(c.get() + 1));
        let other = talkback.clone();

        talkback.end();
        other.end();
        talkback.end();

        assert_eq!(calls.get(), 1);
        assert!(talkback.is_ended());
        assert!(other.is_ended());
    }

    #[test]
    fn inert_talkback_is_harmless() {
        let talkback = Talkback::inert();
        assert!(!talkback.is_ended());
        talkback.end();
        assert!(talkback.is_ended());
    }

    #[test]
    fn sink_clone_shares_callback() {
        let seen = Rc::new(Cell::new(0u32));
        let s = Rc::clone(&seen);
        let sink = Sink::new(move |signal: Signal<u32>| {
            if let Signal::Data(v) = signal {
                s.set(s.get() + v);
            }
        });
        let copy = sink.clone();
        sink.send(Signal::Data(2));
        copy.send(Signal::Data(3));
        assert_eq!(seen.get(), 5);
    }
}
