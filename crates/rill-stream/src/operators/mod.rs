#![forbid(unsafe_code)]

//! Stream operators.
//!
//! Every operator exists twice: as a method on [`Source`] for chaining, and as
//! a curried free function with the `Source -> Source` shape accepted by
//! [`Source::pipe`].
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use rill_stream::from_array;
//! use rill_stream::operators::{filter, map};
//!
//! let evens_doubled = from_array(vec![1, 2, 3, 4])
//!     .pipe(filter(|x: &i32| x % 2 == 0))
//!     .pipe(map(|x: i32| x * 2));
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let _sub = evens_doubled.for_each(move |x| sink.borrow_mut().push(x));
//! assert_eq!(*seen.borrow(), vec![4, 8]);
//! ```

mod combine;
mod distinct;
mod filter;
mod lift;
mod map;
mod scan;
mod share;
mod take;

use std::fmt::Display;

pub use combine::{combine, combine2, combine3};

use crate::source::Source;

/// Curried [`Source::map`].
pub fn map<T, U>(f: impl Fn(T) -> U + 'static) -> impl FnOnce(Source<T>) -> Source<U>
where
    T: 'static,
    U: 'static,
{
    move |source| source.map(f)
}

/// Curried [`Source::try_map`].
pub fn try_map<T, U, E>(
    f: impl Fn(T) -> Result<U, E> + 'static,
) -> impl FnOnce(Source<T>) -> Source<U>
where
    T: 'static,
    U: 'static,
    E: Display,
{
    move |source| source.try_map(f)
}

/// Curried [`Source::filter`].
pub fn filter<T: 'static>(
    predicate: impl Fn(&T) -> bool + 'static,
) -> impl FnOnce(Source<T>) -> Source<T> {
    move |source| source.filter(predicate)
}

/// Curried [`Source::try_filter`].
pub fn try_filter<T: 'static, E: Display>(
    predicate: impl Fn(&T) -> Result<bool, E> + 'static,
) -> impl FnOnce(Source<T>) -> Source<T> {
    move |source| source.try_filter(predicate)
}

/// Curried [`Source::scan`].
pub fn scan<T, A>(seed: A, f: impl Fn(&A, T) -> A + 'static) -> impl FnOnce(Source<T>) -> Source<A>
where
    T: 'static,
    A: Clone + 'static,
{
    move |source| source.scan(seed, f)
}

/// Curried [`Source::distinct_until_changed`].
pub fn distinct_until_changed<T: Clone + PartialEq + 'static>() -> impl FnOnce(Source<T>) -> Source<T>
{
    Source::<T>::distinct_until_changed
}

/// Curried [`Source::take`].
pub fn take<T: 'static>(n: usize) -> impl FnOnce(Source<T>) -> Source<T> {
    move |source| source.take(n)
}

/// Curried [`Source::share`].
pub fn share<T: Clone + 'static>() -> impl FnOnce(Source<T>) -> Source<T> {
    Source::<T>::share
}
