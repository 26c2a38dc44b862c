#![forbid(unsafe_code)]

//! Callbag-style push streams for Rill.
//!
//! A [`Source`] is a recipe for a value sequence. Connecting a [`Sink`] to it
//! opens a channel: the sink first receives [`Signal::Start`] carrying a
//! [`Talkback`] it can use to cancel, then any number of [`Signal::Data`],
//! then at most one terminal [`Signal::Error`] or [`Signal::End`].
//!
//! - [`create_source`]: build a cold source from a producer closure.
//! - [`operators`]: `map`, `filter`, `scan`, `take`, `combine`, `share`, ...
//! - [`Subject`]: hot multicast source pushed imperatively.
//! - [`Promise`] / [`from_promise`]: single-shot values settled later.
//! - [`Subscription`]: RAII guard returned by [`Source::subscribe`].
//!
//! # Architecture
//!
//! Delivery is synchronous and single-threaded. Every type here uses
//! `Rc`/`RefCell` and is `!Send`. A signal is delivered inside the call stack
//! of whoever produced it (an [`Emitter`] call, a [`Resolver`], a
//! [`Subject::next`]).
//!
//! # Invariants
//!
//! 1. `Start` is the first signal on every channel and arrives exactly once.
//! 2. Nothing follows a terminal signal.
//! 3. Ending a talkback stops delivery immediately and runs the producer's
//!    [`Disposer`] at most once.
//! 4. Per sink, data arrives in the order the producer emitted it.

pub mod constructors;
pub mod disposer;
pub mod error;
pub mod operators;
pub mod promise;
pub mod signal;
pub mod sink;
pub mod source;
pub mod subject;
pub mod subscription;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use constructors::{empty, from_array, from_iter};
pub use disposer::Disposer;
pub use error::{Result, StreamError};
pub use operators::{combine, combine2, combine3};
pub use promise::{Promise, Resolver, from_promise};
pub use signal::Signal;
pub use sink::{Sink, Talkback};
pub use source::{Emitter, Source, create_source};
pub use subject::Subject;
pub use subscription::{Observer, Subscription};
#[cfg(any(test, feature = "test-helpers"))]
pub use testing::{Recorded, Recorder};
