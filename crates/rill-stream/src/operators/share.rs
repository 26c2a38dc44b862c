#![forbid(unsafe_code)]

//! Reference-counted multicasting.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

use crate::signal::Signal;
use crate::sink::{Sink, Talkback};
use crate::source::Source;

struct ShareHub<T> {
    source: Source<T>,
    sinks: RefCell<Vec<(u64, Sink<T>)>>,
    next_id: Cell<u64>,
    upstream: RefCell<Option<Talkback>>,
    connected: Cell<bool>,
}

impl<T: Clone + 'static> ShareHub<T> {
    fn contains(&self, id: u64) -> bool {
        self.sinks.borrow().iter().any(|(sid, _)| *sid == id)
    }

    fn remove(&self, id: u64) {
        self.sinks.borrow_mut().retain(|(sid, _)| *sid != id);
        if self.sinks.borrow().is_empty() && self.connected.replace(false) {
            trace!("last shared subscriber left, cancelling upstream");
            let upstream = self.upstream.borrow_mut().take();
            if let Some(upstream) = upstream {
                upstream.end();
            }
        }
    }

    fn attach(hub: &Rc<Self>, sink: Sink<T>) {
        let id = hub.next_id.get();
        hub.next_id.set(id + 1);
        hub.sinks.borrow_mut().push((id, sink.clone()));

        let weak = Rc::downgrade(hub);
        sink.send(Signal::Start(Talkback::new(move || {
            if let Some(hub) = weak.upgrade() {
                hub.remove(id);
            }
        })));

        if hub.contains(id) && !hub.connected.replace(true) {
            trace!("first shared subscriber, connecting upstream");
            let relay = Rc::clone(hub);
            hub.source
                .connect(Sink::new(move |signal| relay.relay(signal)));
        }
    }

    fn relay(&self, signal: Signal<T>) {
        match signal {
            Signal::Start(talkback) => {
                if self.connected.get() {
                    *self.upstream.borrow_mut() = Some(talkback);
                } else {
                    talkback.end();
                }
            }
            Signal::Data(value) => {
                let targets = self.sinks.borrow().clone();
                for (id, sink) in targets {
                    if self.contains(id) {
                        sink.send(Signal::Data(value.clone()));
                    }
                }
            }
            Signal::Error(error) => {
                for sink in self.disconnect() {
                    sink.send(Signal::Error(error.clone()));
                }
            }
            Signal::End => {
                for sink in self.disconnect() {
                    sink.send(Signal::End);
                }
            }
        }
    }

    fn disconnect(&self) -> Vec<Sink<T>> {
        self.connected.set(false);
        let upstream = self.upstream.borrow_mut().take();
        drop(upstream);
        std::mem::take(&mut *self.sinks.borrow_mut())
            .into_iter()
            .map(|(_, sink)| sink)
            .collect()
    }
}

impl<T: Clone + 'static> Source<T> {
    /// Multicast one upstream subscription to every subscriber.
    ///
    /// The first subscriber connects upstream; the last one to leave cancels
    /// it. A later subscriber after that connects afresh.
    #[must_use]
    pub fn share(self) -> Source<T> {
        let hub = Rc::new(ShareHub {
            source: self,
            sinks: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            upstream: RefCell::new(None),
            connected: Cell::new(false),
        });
        Source::from_fn(move |sink| ShareHub::attach(&hub, sink))
    }
}
