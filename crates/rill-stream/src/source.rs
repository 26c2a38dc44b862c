#![forbid(unsafe_code)]

//! Sources and the producer-backed [`create_source`] constructor.
//!
//! # Invariants
//!
//! 1. A sink receives `Start` before anything else, exactly once per
//!    subscription.
//! 2. After a terminal signal, or after the sink ends its talkback, no further
//!    signal reaches that sink.
//! 3. The producer's [`Disposer`] runs at most once per subscription: on
//!    cancellation, or right after natural completion/error.
//! 4. Every subscription invokes the producer afresh; sources are cold.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace};

use crate::disposer::Disposer;
use crate::error::{Result, StreamError};
use crate::signal::Signal;
use crate::sink::{Sink, Talkback};

static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

fn next_channel_id() -> u64 {
    NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed)
}

/// A subscribable producer of values over time.
///
/// Cloning a `Source` is cheap and yields the same recipe; each
/// [`connect`](Source::connect) starts an independent value sequence.
pub struct Source<T> {
    connect: Rc<dyn Fn(Sink<T>)>,
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        Self {
            connect: Rc::clone(&self.connect),
        }
    }
}

impl<T> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source").finish_non_exhaustive()
    }
}

impl<T: 'static> Source<T> {
    /// Build a source from a raw connect function.
    ///
    /// The function must honor the protocol invariants listed in the module
    /// docs. Prefer [`create_source`] unless writing an operator.
    #[must_use]
    pub fn from_fn(connect: impl Fn(Sink<T>) + 'static) -> Self {
        Self {
            connect: Rc::new(connect),
        }
    }

    /// Attach a raw sink.
    pub fn connect(&self, sink: Sink<T>) {
        (self.connect)(sink);
    }

    /// Apply a `Source -> Source` operator.
    #[must_use]
    pub fn pipe<U>(self, operator: impl FnOnce(Source<T>) -> Source<U>) -> Source<U> {
        operator(self)
    }
}

/// Shared state of one producer-backed subscription.
struct Channel<T> {
    id: u64,
    sink: RefCell<Option<Sink<T>>>,
    disposer: RefCell<Option<Disposer>>,
    closed: Cell<bool>,
}

impl<T: 'static> Channel<T> {
    fn new(sink: Sink<T>) -> Self {
        Self {
            id: next_channel_id(),
            sink: RefCell::new(Some(sink)),
            disposer: RefCell::new(None),
            closed: Cell::new(false),
        }
    }

    fn data(&self, value: T) {
        if self.closed.get() {
            return;
        }
        let sink = self.sink.borrow().clone();
        if let Some(sink) = sink {
            sink.send(Signal::Data(value));
        }
    }

    fn finish(&self, signal: Signal<T>) {
        if self.closed.replace(true) {
            return;
        }
        trace!(channel = self.id, signal = signal.kind(), "source finished");
        let sink = self.sink.borrow_mut().take();
        if let Some(sink) = sink {
            sink.send(signal);
        }
        self.dispose();
    }

    fn cancel(&self) {
        if self.closed.replace(true) {
            return;
        }
        trace!(channel = self.id, "source cancelled");
        let sink = self.sink.borrow_mut().take();
        drop(sink);
        self.dispose();
    }

    fn install(&self, disposer: Disposer) {
        if self.closed.get() {
            disposer.dispose();
        } else {
            *self.disposer.borrow_mut() = Some(disposer);
        }
    }

    fn dispose(&self) {
        let disposer = self.disposer.borrow_mut().take();
        if let Some(disposer) = disposer {
            trace!(channel = self.id, "disposer ran");
            disposer.dispose();
        }
    }
}

/// The `{next, error, complete}` bundle handed to a producer.
///
/// Calls made after the channel closed (terminal signal or cancellation) are
/// silently dropped. Cloneable so asynchronous producers can keep it.
pub struct Emitter<T> {
    channel: Rc<Channel<T>>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            channel: Rc::clone(&self.channel),
        }
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("channel", &self.channel.id)
            .field("closed", &self.channel.closed.get())
            .finish()
    }
}

impl<T: 'static> Emitter<T> {
    /// Push one value.
    pub fn next(&self, value: T) {
        self.channel.data(value);
    }

    /// Terminate with an error.
    pub fn error(&self, error: StreamError) {
        self.channel.finish(Signal::Error(error));
    }

    /// Terminate normally.
    pub fn complete(&self) {
        self.channel.finish(Signal::End);
    }

    /// Whether the channel no longer accepts values.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.channel.closed.get()
    }
}

/// Create a cold source from a producer.
///
/// The producer runs once per subscription, after the sink has received
/// `Start`; it is skipped if the sink ends the talkback during `Start`. An
/// `Err` return terminates the stream with that error. If the channel closed
/// while the producer was still running (synchronous completion or
/// cancellation), the returned disposer runs immediately.
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use rill_stream::{Disposer, create_source};
///
/// let numbers = create_source(|emitter| {
///     emitter.next(1);
///     emitter.next(2);
///     emitter.complete();
///     Ok(Disposer::noop())
/// });
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// let _sub = numbers.for_each(move |n| sink.borrow_mut().push(n));
/// assert_eq!(*seen.borrow(), vec![1, 2]);
/// ```
#[must_use]
pub fn create_source<T, P>(producer: P) -> Source<T>
where
    T: 'static,
    P: Fn(Emitter<T>) -> Result<Disposer> + 'static,
{
    Source::from_fn(move |sink: Sink<T>| {
        let channel = Rc::new(Channel::new(sink.clone()));
        let cancel = Rc::clone(&channel);
        sink.send(Signal::Start(Talkback::new(move || cancel.cancel())));
        if channel.closed.get() {
            return;
        }
        trace!(channel = channel.id, "producer started");
        match producer(Emitter {
            channel: Rc::clone(&channel),
        }) {
            Ok(disposer) => channel.install(disposer),
            Err(error) => {
                debug!(channel = channel.id, %error, "producer failed");
                channel.finish(Signal::Error(error));
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Recorded, Recorder};

    fn counting_source(
        starts: Rc<Cell<u32>>,
        disposals: Rc<Cell<u32>>,
    ) -> (Source<u32>, Rc<RefCell<Option<Emitter<u32>>>>) {
        let slot: Rc<RefCell<Option<Emitter<u32>>>> = Rc::new(RefCell::new(None));
        let keep = Rc::clone(&slot);
        let source = create_source(move |emitter| {
            starts.set(starts.get() + 1);
            *keep.borrow_mut() = Some(emitter);
            let d = Rc::clone(&disposals);
            Ok(Disposer::new(move || d.set(d.get() + 1)))
        });
        (source, slot)
    }

    fn emitter(slot: &Rc<RefCell<Option<Emitter<u32>>>>) -> Emitter<u32> {
        slot.borrow().clone().expect("producer ran")
    }

    #[test]
    fn values_flow_in_order() {
        let starts = Rc::new(Cell::new(0));
        let disposals = Rc::new(Cell::new(0));
        let (source, slot) = counting_source(Rc::clone(&starts), Rc::clone(&disposals));

        let recorder = Recorder::attach(&source);
        let em = emitter(&slot);
        em.next(1);
        em.next(2);
        em.complete();

        assert_eq!(
            recorder.events(),
            vec![Recorded::Data(1), Recorded::Data(2), Recorded::End]
        );
        assert_eq!(starts.get(), 1);
        assert_eq!(disposals.get(), 1);
    }

    #[test]
    fn next_after_complete_is_dropped() {
        let (source, slot) = counting_source(Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
        let recorder = Recorder::attach(&source);
        let em = emitter(&slot);
        em.complete();
        em.next(7);
        em.error(StreamError::producer("late"));
        assert_eq!(recorder.events(), vec![Recorded::End]);
        assert!(em.is_closed());
    }

    #[test]
    fn cancel_disposes_exactly_once() {
        let disposals = Rc::new(Cell::new(0));
        let (source, slot) = counting_source(Rc::new(Cell::new(0)), Rc::clone(&disposals));
        let recorder = Recorder::attach(&source);

        recorder.cancel();
        recorder.cancel();
        emitter(&slot).next(1);
        emitter(&slot).complete();

        assert_eq!(disposals.get(), 1);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn each_subscription_runs_the_producer() {
        let starts = Rc::new(Cell::new(0));
        let disposals = Rc::new(Cell::new(0));
        let (source, _slot) = counting_source(Rc::clone(&starts), Rc::clone(&disposals));

        for _ in 0..3 {
            let recorder = Recorder::attach(&source);
            recorder.cancel();
        }
        assert_eq!(starts.get(), 3);
        assert_eq!(disposals.get(), 3);
    }

    #[test]
    fn producer_error_becomes_error_signal() {
        let source: Source<u8> = create_source(|emitter| {
            emitter.next(1);
            Err(StreamError::producer("boom"))
        });
        let recorder = Recorder::attach(&source);
        assert_eq!(
            recorder.events(),
            vec![
                Recorded::Data(1),
                Recorded::Error(StreamError::producer("boom"))
            ]
        );
    }

    #[test]
    fn synchronous_completion_still_disposes() {
        let disposals = Rc::new(Cell::new(0));
        let d = Rc::clone(&disposals);
        let source = create_source(move |emitter| {
            emitter.next(1u8);
            emitter.complete();
            let d = Rc::clone(&d);
            Ok(Disposer::new(move || d.set(d.get() + 1)))
        });
        let recorder = Recorder::attach(&source);
        recorder.cancel();
        assert!(recorder.is_completed());
        assert_eq!(disposals.get(), 1);
    }

    #[test]
    fn cancel_during_start_skips_producer() {
        let starts = Rc::new(Cell::new(0));
        let s = Rc::clone(&starts);
        let source = create_source(move |_emitter: Emitter<u8>| {
            s.set(s.get() + 1);
            Ok(Disposer::noop())
        });
        source.connect(Sink::new(|signal| {
            if let Signal::Start(talkback) = signal {
                talkback.end();
            }
        }));
        assert_eq!(starts.get(), 0);
    }

    #[test]
    fn pipe_applies_operator() {
        let source = crate::from_array(vec![1, 2, 3]).pipe(crate::operators::map(|x: i32| x + 1));
        assert_eq!(Recorder::attach(&source).values(), vec![2, 3, 4]);
    }
}
