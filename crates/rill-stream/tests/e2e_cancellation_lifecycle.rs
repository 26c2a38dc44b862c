#![forbid(unsafe_code)]

//! E2E tests for subscription lifecycles across operator chains.
//!
//! Validates that:
//! 1. Cancelling at the end of a chain disposes the producer at its head.
//! 2. Repeated subscribe/cancel cycles leak no producers.
//! 3. A promise-backed chain settles exactly once per subscriber.
//! 4. Producer and transform errors surface as error signals, never panics.
//! 5. Stream internals log at trace level.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rill_stream::{
    Disposer, Emitter, Observer, Promise, Recorded, Recorder, StreamError, Subject,
    create_source, from_promise,
};
use tracing_test::traced_test;

// ============================================================================
// Helpers
// ============================================================================

/// A ticker whose emitter is parked in `slot` and that counts live producers.
fn ticker(
    live: Rc<Cell<i32>>,
    slot: Rc<RefCell<Option<Emitter<u32>>>>,
) -> rill_stream::Source<u32> {
    create_source(move |emitter| {
        live.set(live.get() + 1);
        *slot.borrow_mut() = Some(emitter);
        let live = Rc::clone(&live);
        Ok(Disposer::new(move || live.set(live.get() - 1)))
    })
}

fn tick(slot: &Rc<RefCell<Option<Emitter<u32>>>>, value: u32) {
    let emitter = slot.borrow().clone();
    if let Some(emitter) = emitter {
        emitter.next(value);
    }
}

// ============================================================================
// Cancellation through chains
// ============================================================================

#[test]
fn cancel_at_tail_disposes_head() {
    let live = Rc::new(Cell::new(0));
    let slot = Rc::new(RefCell::new(None));
    let chain = ticker(Rc::clone(&live), Rc::clone(&slot))
        .map(|x| x * 10)
        .filter(|x| *x > 10)
        .scan(0, |acc, x| acc + x);

    let rec = Recorder::attach(&chain);
    assert_eq!(live.get(), 1);
    tick(&slot, 1);
    tick(&slot, 2);
    tick(&slot, 3);
    assert_eq!(rec.values(), vec![20, 50]);

    rec.cancel();
    assert_eq!(live.get(), 0);
    tick(&slot, 4);
    assert_eq!(rec.values(), vec![20, 50]);
}

#[test]
fn repeated_cycles_leak_nothing() {
    let live = Rc::new(Cell::new(0));
    let slot = Rc::new(RefCell::new(None));
    let chain = ticker(Rc::clone(&live), Rc::clone(&slot)).map(|x| x + 1);
    for round in 0..50 {
        let sub = chain.for_each(|_| {});
        assert_eq!(live.get(), 1, "round {round}");
        drop(sub);
        assert_eq!(live.get(), 0, "round {round}");
    }
}

#[test]
fn take_releases_head_after_last_value() {
    let live = Rc::new(Cell::new(0));
    let slot = Rc::new(RefCell::new(None));
    let rec = Recorder::attach(&ticker(Rc::clone(&live), Rc::clone(&slot)).take(2));
    tick(&slot, 7);
    tick(&slot, 8);
    assert_eq!(live.get(), 0);
    assert_eq!(
        rec.events(),
        vec![Recorded::Data(7), Recorded::Data(8), Recorded::End]
    );
}

#[test]
fn shared_chain_disposes_once_all_leave() {
    let live = Rc::new(Cell::new(0));
    let slot = Rc::new(RefCell::new(None));
    let shared = ticker(Rc::clone(&live), Rc::clone(&slot)).share();
    let subs: Vec<_> = (0..4).map(|_| Recorder::attach(&shared)).collect();
    assert_eq!(live.get(), 1);
    tick(&slot, 3);
    assert!(subs.iter().all(|rec| rec.values() == vec![3]));
    drop(subs);
    assert_eq!(live.get(), 0);
}

// ============================================================================
// Promises
// ============================================================================

#[test]
fn promise_chain_settles_per_subscriber() {
    let (promise, resolver) = Promise::pending();
    let doubled = from_promise(promise).map(|x: u64| x * 2);
    let a = Recorder::attach(&doubled);
    let b = Recorder::attach(&doubled);
    b.cancel();
    resolver.resolve(21);
    assert_eq!(a.events(), vec![Recorded::Data(42), Recorded::End]);
    assert!(b.events().is_empty());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn errors_reach_observer_callbacks() {
    let subject = Subject::new();
    let errors = Rc::new(RefCell::new(Vec::new()));
    let e = Rc::clone(&errors);
    let _sub = subject
        .source()
        .try_map(|s: String| s.parse::<i32>())
        .subscribe(Observer::new().on_error(move |err| e.borrow_mut().push(err)));
    subject.next("12".to_owned());
    subject.next("twelve".to_owned());
    assert_eq!(errors.borrow().len(), 1);
    assert!(matches!(&errors.borrow()[0], StreamError::Transform(_)));
    assert_eq!(subject.subscriber_count(), 0);
}

// ============================================================================
// Logging
// ============================================================================

#[test]
#[traced_test]
fn producer_failure_is_logged() {
    let source = create_source(|_emitter: Emitter<u8>| Err(StreamError::producer("no device")));
    let rec = Recorder::attach(&source);
    assert_eq!(rec.error(), Some(StreamError::producer("no device")));
    assert!(logs_contain("producer failed"));
}
