#![forbid(unsafe_code)]

//! Latest-value combination of several sources.
//!
//! Nothing is emitted until every input has produced a value. After that,
//! each input value re-emits the full tuple of latest values. The output
//! completes once every input has completed. An input error terminates the
//! output right away and cancels the remaining inputs.
//!
//! Inputs derived from the same hot source are updated one after the other,
//! so such a combination briefly emits a tuple mixing old and new values.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

use super::lift::{Step, lift};
use crate::error::StreamError;
use crate::signal::Signal;
use crate::sink::{Sink, Talkback};
use crate::source::Source;

struct Combiner<T> {
    latest: RefCell<Vec<Option<T>>>,
    talkbacks: RefCell<Vec<Option<Talkback>>>,
    active: Cell<usize>,
    done: Cell<bool>,
}

impl<T: Clone + 'static> Combiner<T> {
    fn new(inputs: usize) -> Self {
        Self {
            latest: RefCell::new(vec![None; inputs]),
            talkbacks: RefCell::new(vec![None; inputs]),
            active: Cell::new(inputs),
            done: Cell::new(false),
        }
    }

    fn snapshot(&self) -> Option<Vec<T>> {
        self.latest.borrow().iter().cloned().collect()
    }

    fn cancel_all(&self) {
        let talkbacks = std::mem::take(&mut *self.talkbacks.borrow_mut());
        for talkback in talkbacks.into_iter().flatten() {
            talkback.end();
        }
    }

    fn cancel(&self) {
        if !self.done.replace(true) {
            self.cancel_all();
        }
    }

    fn on_signal(&self, slot: usize, signal: Signal<T>, downstream: &Sink<Vec<T>>) {
        match signal {
            Signal::Start(talkback) => {
                if self.done.get() {
                    talkback.end();
                } else if let Some(entry) = self.talkbacks.borrow_mut().get_mut(slot) {
                    *entry = Some(talkback);
                }
            }
            Signal::Data(value) => {
                if self.done.get() {
                    return;
                }
                if let Some(entry) = self.latest.borrow_mut().get_mut(slot) {
                    *entry = Some(value);
                }
                if let Some(tuple) = self.snapshot() {
                    downstream.send(Signal::Data(tuple));
                }
            }
            Signal::Error(error) => {
                if self.done.replace(true) {
                    return;
                }
                trace!(slot, %error, "combine input failed");
                if let Some(entry) = self.talkbacks.borrow_mut().get_mut(slot) {
                    *entry = None;
                }
                self.cancel_all();
                downstream.send(Signal::Error(error));
            }
            Signal::End => {
                if self.done.get() {
                    return;
                }
                if let Some(entry) = self.talkbacks.borrow_mut().get_mut(slot) {
                    *entry = None;
                }
                let active = self.active.get().saturating_sub(1);
                self.active.set(active);
                if active == 0 {
                    self.done.set(true);
                    downstream.send(Signal::End);
                }
            }
        }
    }
}

/// Combine the latest values of every input into a `Vec`, in input order.
///
/// An empty input list completes immediately.
#[must_use]
pub fn combine<T: Clone + 'static>(sources: Vec<Source<T>>) -> Source<Vec<T>> {
    let sources: Rc<[Source<T>]> = sources.into();
    Source::from_fn(move |downstream: Sink<Vec<T>>| {
        let combiner = Rc::new(Combiner::new(sources.len()));
        let weak = Rc::downgrade(&combiner);
        downstream.send(Signal::Start(Talkback::new(move || {
            if let Some(combiner) = weak.upgrade() {
                combiner.cancel();
            }
        })));
        if sources.is_empty() {
            if !combiner.done.replace(true) {
                downstream.send(Signal::End);
            }
            return;
        }
        for (slot, source) in sources.iter().enumerate() {
            if combiner.done.get() {
                break;
            }
            let combiner = Rc::clone(&combiner);
            let downstream = downstream.clone();
            source.connect(Sink::new(move |signal| {
                combiner.on_signal(slot, signal, &downstream);
            }));
        }
    })
}

#[derive(Clone)]
enum Slot<A, B, C> {
    A(A),
    B(B),
    C(C),
}

/// Combine two sources of different types into tuples.
#[must_use]
pub fn combine2<A, B>(a: Source<A>, b: Source<B>) -> Source<(A, B)>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    let merged = combine(vec![
        a.map(Slot::<A, B, ()>::A),
        b.map(Slot::<A, B, ()>::B),
    ]);
    lift(merged, || {
        |slots: Vec<Slot<A, B, ()>>| match slots.as_slice() {
            [Slot::A(a), Slot::B(b)] => Step::Emit((a.clone(), b.clone())),
            _ => Step::Fail(StreamError::transform("combine2 slot mismatch")),
        }
    })
}

/// Combine three sources of different types into tuples.
#[must_use]
pub fn combine3<A, B, C>(a: Source<A>, b: Source<B>, c: Source<C>) -> Source<(A, B, C)>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    let merged = combine(vec![
        a.map(Slot::<A, B, C>::A),
        b.map(Slot::<A, B, C>::B),
        c.map(Slot::<A, B, C>::C),
    ]);
    lift(merged, || {
        |slots: Vec<Slot<A, B, C>>| match slots.as_slice() {
            [Slot::A(a), Slot::B(b), Slot::C(c)] => {
                Step::Emit((a.clone(), b.clone(), c.clone()))
            }
            _ => Step::Fail(StreamError::transform("combine3 slot mismatch")),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructors::{empty, from_array};
    use crate::subject::Subject;
    use crate::testing::{Recorded, Recorder};

    #[test]
    fn waits_for_every_input() {
        let a = Subject::new();
        let b = Subject::new();
        let rec = Recorder::attach(&combine(vec![a.source(), b.source()]));
        a.next(1);
        a.next(2);
        assert!(rec.events().is_empty());
        b.next(10);
        a.next(3);
        assert_eq!(rec.values(), vec![vec![2, 10], vec![3, 10]]);
    }

    #[test]
    fn lock_step_subjects() {
        let numbers = Subject::new();
        let letters = Subject::new();
        let rec = Recorder::attach(&combine2(numbers.source(), letters.source()));
        numbers.next(1);
        letters.next('a');
        numbers.next(2);
        letters.next('b');
        numbers.complete();
        assert!(!rec.is_completed());
        letters.complete();
        assert_eq!(
            rec.events(),
            vec![
                Recorded::Data((1, 'a')),
                Recorded::Data((2, 'a')),
                Recorded::Data((2, 'b')),
                Recorded::End
            ]
        );
    }

    #[test]
    fn synchronous_arrays_use_latest_value() {
        let rec = Recorder::attach(&combine2(
            from_array(vec![1, 2]),
            from_array(vec!['a', 'b']),
        ));
        assert_eq!(
            rec.events(),
            vec![
                Recorded::Data((2, 'a')),
                Recorded::Data((2, 'b')),
                Recorded::End
            ]
        );
    }

    #[test]
    fn error_cancels_siblings() {
        let a = Subject::<u8>::new();
        let b = Subject::<u8>::new();
        let rec = Recorder::attach(&combine(vec![a.source(), b.source()]));
        a.error(StreamError::producer("a broke"));
        assert_eq!(rec.error(), Some(StreamError::producer("a broke")));
        assert_eq!(b.subscriber_count(), 0);
        b.next(1);
        assert_eq!(rec.events().len(), 1);
    }

    #[test]
    fn cancel_reaches_all_inputs() {
        let a = Subject::<u8>::new();
        let b = Subject::<u8>::new();
        let rec = Recorder::attach(&combine(vec![a.source(), b.source()]));
        assert_eq!((a.subscriber_count(), b.subscriber_count()), (1, 1));
        rec.cancel();
        assert_eq!((a.subscriber_count(), b.subscriber_count()), (0, 0));
    }

    #[test]
    fn empty_inputs_complete() {
        let rec = Recorder::attach(&combine(Vec::<Source<u8>>::new()));
        assert_eq!(rec.events(), vec![Recorded::End]);
    }

    #[test]
    fn silent_input_completes_without_values() {
        let rec = Recorder::attach(&combine(vec![from_array(vec![1]), empty()]));
        assert_eq!(rec.events(), vec![Recorded::End]);
    }

    #[test]
    fn combine3_tuples() {
        let rec = Recorder::attach(&combine3(
            from_array(vec![1u8]),
            from_array(vec!["x"]),
            from_array(vec![true]),
        ));
        assert_eq!(rec.values(), vec![(1, "x", true)]);
    }
}
