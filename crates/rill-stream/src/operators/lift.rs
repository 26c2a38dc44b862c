#![forbid(unsafe_code)]

//! Shared plumbing for one-input operators.
//!
//! [`lift`] connects to the upstream source once per downstream sink, runs a
//! per-subscription step function on every value, and relays the outcome.
//! Downstream gets its own talkback; ending it cancels upstream.
//!
//! The step function is never borrowed while a signal is being delivered, so
//! a sink may push into the same pipeline re-entrantly. A transform may not:
//! a value that reaches the operator while its own step function is running
//! cancels upstream and fails the stream with [`StreamError::Transform`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::StreamError;
use crate::signal::Signal;
use crate::sink::{Sink, Talkback};
use crate::source::Source;

/// What an operator does with one upstream value.
pub(crate) enum Step<U> {
    /// Forward a value.
    Emit(U),
    /// Drop the value.
    Skip,
    /// Cancel upstream and fail downstream.
    Fail(StreamError),
    /// Forward a value, then cancel upstream and complete downstream.
    Last(U),
}

#[derive(Default)]
struct Relay {
    upstream: RefCell<Option<Talkback>>,
    done: Cell<bool>,
}

impl Relay {
    /// End the upstream talkback. Returns false if the relay already finished.
    fn cancel(&self) -> bool {
        if self.done.replace(true) {
            return false;
        }
        let upstream = self.upstream.borrow_mut().take();
        if let Some(upstream) = upstream {
            upstream.end();
        }
        true
    }

    /// Upstream terminated on its own. Returns false if already finished.
    fn settle(&self) -> bool {
        if self.done.replace(true) {
            return false;
        }
        let upstream = self.upstream.borrow_mut().take();
        drop(upstream);
        true
    }
}

pub(crate) fn lift<T, U, F, M>(source: Source<T>, make: M) -> Source<U>
where
    T: 'static,
    U: 'static,
    F: FnMut(T) -> Step<U> + 'static,
    M: Fn() -> F + 'static,
{
    Source::from_fn(move |downstream: Sink<U>| {
        let relay = Rc::new(Relay::default());
        let step = RefCell::new(make());
        let weak = Rc::downgrade(&relay);
        source.connect(Sink::new(move |signal: Signal<T>| match signal {
            Signal::Start(talkback) => {
                *relay.upstream.borrow_mut() = Some(talkback);
                let weak = weak.clone();
                downstream.send(Signal::Start(Talkback::new(move || {
                    if let Some(relay) = weak.upgrade() {
                        relay.cancel();
                    }
                })));
            }
            Signal::Data(value) => {
                if relay.done.get() {
                    return;
                }
                let outcome = match step.try_borrow_mut() {
                    Ok(mut step) => (&mut *step)(value),
                    Err(_) => Step::Fail(StreamError::transform(
                        "value pushed from inside the operator's own transform",
                    )),
                };
                // The transform may have cancelled this subscription.
                if relay.done.get() {
                    return;
                }
                match outcome {
                    Step::Emit(value) => downstream.send(Signal::Data(value)),
                    Step::Skip => {}
                    Step::Fail(error) => {
                        if relay.cancel() {
                            downstream.send(Signal::Error(error));
                        }
                    }
                    Step::Last(value) => {
                        downstream.send(Signal::Data(value));
                        if relay.cancel() {
                            downstream.send(Signal::End);
                        }
                    }
                }
            }
            Signal::Error(error) => {
                if relay.settle() {
                    downstream.send(Signal::Error(error));
                }
            }
            Signal::End => {
                if relay.settle() {
                    downstream.send(Signal::End);
                }
            }
        }));
    })
}
