#![forbid(unsafe_code)]

use std::fmt::Display;
use std::rc::Rc;

use super::lift::{Step, lift};
use crate::error::StreamError;
use crate::source::Source;

impl<T: 'static> Source<T> {
    /// Keep only values matching `predicate`.
    #[must_use]
    pub fn filter(self, predicate: impl Fn(&T) -> bool + 'static) -> Source<T> {
        let predicate = Rc::new(predicate);
        lift(self, move || {
            let predicate = Rc::clone(&predicate);
            move |value: T| {
                if predicate(&value) {
                    Step::Emit(value)
                } else {
                    Step::Skip
                }
            }
        })
    }

    /// Like [`filter`](Source::filter) with a fallible predicate.
    ///
    /// The first `Err` cancels upstream and terminates the stream with
    /// [`StreamError::Transform`]; the value is not skipped.
    #[must_use]
    pub fn try_filter<E: Display>(
        self,
        predicate: impl Fn(&T) -> Result<bool, E> + 'static,
    ) -> Source<T> {
        let predicate = Rc::new(predicate);
        lift(self, move || {
            let predicate = Rc::clone(&predicate);
            move |value: T| match predicate(&value) {
                Ok(true) => Step::Emit(value),
                Ok(false) => Step::Skip,
                Err(error) => Step::Fail(StreamError::transform(error)),
            }
        })
    }
}
