#![forbid(unsafe_code)]

use std::fmt::Display;
use std::rc::Rc;

use super::lift::{Step, lift};
use crate::error::StreamError;
use crate::source::Source;

impl<T: 'static> Source<T> {
    /// Transform every value.
    #[must_use]
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Source<U> {
        let f = Rc::new(f);
        lift(self, move || {
            let f = Rc::clone(&f);
            move |value: T| Step::Emit(f(value))
        })
    }

    /// Transform every value with a fallible function.
    ///
    /// The first `Err` cancels upstream and terminates the stream with
    /// [`StreamError::Transform`].
    #[must_use]
    pub fn try_map<U, E>(self, f: impl Fn(T) -> Result<U, E> + 'static) -> Source<U>
    where
        U: 'static,
        E: Display,
    {
        let f = Rc::new(f);
        lift(self, move || {
            let f = Rc::clone(&f);
            move |value: T| match f(value) {
                Ok(mapped) => Step::Emit(mapped),
                Err(error) => Step::Fail(StreamError::transform(error)),
            }
        })
    }
}
