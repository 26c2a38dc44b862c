#![forbid(unsafe_code)]

//! Settle-once values and the [`from_promise`] bridge.
//!
//! A [`Promise`] is read-only; the paired [`Resolver`] settles it. Whoever
//! calls [`Resolver::resolve`] or [`Resolver::reject`] plays the role of the
//! host task scheduler: continuations run synchronously inside that call.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::disposer::Disposer;
use crate::error::{Result, StreamError};
use crate::source::{Source, create_source};

/// Handle returned by [`Promise::then`], used to unregister a continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContinuationId(u64);

type Continuation<T> = Box<dyn FnOnce(Result<T>)>;

enum Settlement<T> {
    Pending,
    Fulfilled(T),
    Rejected(StreamError),
}

struct PromiseInner<T> {
    settlement: RefCell<Settlement<T>>,
    continuations: RefCell<Vec<(ContinuationId, Continuation<T>)>>,
    next_id: Cell<u64>,
}

/// A value that becomes available later, or fails.
pub struct Promise<T> {
    inner: Rc<PromiseInner<T>>,
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.inner.settlement.borrow() {
            Settlement::Pending => "pending",
            Settlement::Fulfilled(_) => "fulfilled",
            Settlement::Rejected(_) => "rejected",
        };
        f.debug_struct("Promise")
            .field("state", &state)
            .field("continuations", &self.inner.continuations.borrow().len())
            .finish()
    }
}

impl<T: Clone + 'static> Promise<T> {
    fn with(settlement: Settlement<T>) -> Self {
        Self {
            inner: Rc::new(PromiseInner {
                settlement: RefCell::new(settlement),
                continuations: RefCell::new(Vec::new()),
                next_id: Cell::new(1),
            }),
        }
    }

    /// A pending promise and the resolver that settles it.
    #[must_use]
    pub fn pending() -> (Self, Resolver<T>) {
        let promise = Self::with(Settlement::Pending);
        let resolver = Resolver {
            promise: promise.clone(),
        };
        (promise, resolver)
    }

    /// An already fulfilled promise.
    #[must_use]
    pub fn resolved(value: T) -> Self {
        Self::with(Settlement::Fulfilled(value))
    }

    /// An already rejected promise.
    #[must_use]
    pub fn rejected(reason: impl fmt::Display) -> Self {
        Self::with(Settlement::Rejected(StreamError::rejected(reason)))
    }

    /// Whether the promise has been fulfilled or rejected.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(&*self.inner.settlement.borrow(), Settlement::Pending)
    }

    /// Register a continuation.
    ///
    /// Runs synchronously right away if the promise is already settled,
    /// otherwise when it settles.
    pub fn then(&self, continuation: impl FnOnce(Result<T>) + 'static) -> ContinuationId {
        let id = ContinuationId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        let outcome = match &*self.inner.settlement.borrow() {
            Settlement::Pending => None,
            Settlement::Fulfilled(value) => Some(Ok(value.clone())),
            Settlement::Rejected(error) => Some(Err(error.clone())),
        };
        match outcome {
            Some(outcome) => continuation(outcome),
            None => self
                .inner
                .continuations
                .borrow_mut()
                .push((id, Box::new(continuation))),
        }
        id
    }

    /// Unregister a continuation that has not run yet.
    pub fn forget(&self, id: ContinuationId) {
        self.inner
            .continuations
            .borrow_mut()
            .retain(|(cid, _)| *cid != id);
    }

    fn settle(&self, outcome: Result<T>) {
        {
            let mut settlement = self.inner.settlement.borrow_mut();
            if !matches!(&*settlement, Settlement::Pending) {
                return;
            }
            *settlement = match &outcome {
                Ok(value) => Settlement::Fulfilled(value.clone()),
                Err(error) => Settlement::Rejected(error.clone()),
            };
        }
        let continuations = std::mem::take(&mut *self.inner.continuations.borrow_mut());
        trace!(
            fulfilled = outcome.is_ok(),
            continuations = continuations.len(),
            "promise settled"
        );
        for (_, continuation) in continuations {
            continuation(outcome.clone());
        }
    }
}

/// The write side of a [`Promise`]. Settling consumes it.
pub struct Resolver<T> {
    promise: Promise<T>,
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

impl<T: Clone + 'static> Resolver<T> {
    /// Fulfil the promise.
    pub fn resolve(self, value: T) {
        self.promise.settle(Ok(value));
    }

    /// Reject the promise.
    pub fn reject(self, reason: impl fmt::Display) {
        self.promise.settle(Err(StreamError::rejected(reason)));
    }
}

/// Emit the promise's value then complete, or fail with its rejection.
///
/// Cancelling before settlement unregisters the continuation, so nothing is
/// emitted afterwards. An already settled promise emits synchronously during
/// subscription.
#[must_use]
pub fn from_promise<T: Clone + 'static>(promise: Promise<T>) -> Source<T> {
    create_source(move |emitter| {
        let id = promise.then(move |outcome| match outcome {
            Ok(value) => {
                emitter.next(value);
                emitter.complete();
            }
            Err(error) => emitter.error(error),
        });
        let promise = promise.clone();
        Ok(Disposer::new(move || promise.forget(id)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Recorded, Recorder};

    #[test]
    fn emits_on_resolve() {
        let (promise, resolver) = Promise::pending();
        let rec = Recorder::attach(&from_promise(promise.clone()));
        assert!(rec.events().is_empty());
        resolver.resolve(42);
        assert_eq!(rec.events(), vec![Recorded::Data(42), Recorded::End]);
        assert!(promise.is_settled());
    }

    #[test]
    fn rejection_becomes_error() {
        let (promise, resolver) = Promise::<u8>::pending();
        let rec = Recorder::attach(&from_promise(promise));
        resolver.reject("offline");
        assert_eq!(
            rec.events(),
            vec![Recorded::Error(StreamError::rejected("offline"))]
        );
    }

    #[test]
    fn cancel_before_settlement_suppresses_value() {
        let (promise, resolver) = Promise::pending();
        let rec = Recorder::attach(&from_promise(promise.clone()));
        rec.cancel();
        assert!(format!("{promise:?}").contains("continuations: 0"));
        resolver.resolve("late");
        assert!(rec.events().is_empty());
    }

    #[test]
    fn settled_promise_emits_synchronously() {
        let rec = Recorder::attach(&from_promise(Promise::resolved(7)));
        assert_eq!(rec.events(), vec![Recorded::Data(7), Recorded::End]);

        let rec = Recorder::attach(&from_promise(Promise::<u8>::rejected("no")));
        assert_eq!(rec.error(), Some(StreamError::rejected("no")));
    }

    #[test]
    fn each_subscriber_gets_the_value() {
        let (promise, resolver) = Promise::pending();
        let source = from_promise(promise);
        let a = Recorder::attach(&source);
        let b = Recorder::attach(&source);
        resolver.resolve(1);
        assert_eq!(a.values(), vec![1]);
        assert_eq!(b.values(), vec![1]);
    }

    #[test]
    fn then_after_settle_runs_immediately() {
        let promise = Promise::resolved(3);
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        promise.then(move |outcome| s.set(outcome.unwrap_or(0)));
        assert_eq!(seen.get(), 3);
    }
}
