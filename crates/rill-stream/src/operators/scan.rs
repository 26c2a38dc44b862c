#![forbid(unsafe_code)]

use std::rc::Rc;

use super::lift::{Step, lift};
use crate::source::Source;

impl<T: 'static> Source<T> {
    /// Running fold: emits the accumulator after every value.
    ///
    /// Each subscription starts again from `seed`.
    #[must_use]
    pub fn scan<A>(self, seed: A, f: impl Fn(&A, T) -> A + 'static) -> Source<A>
    where
        A: Clone + 'static,
    {
        let f = Rc::new(f);
        lift(self, move || {
            let f = Rc::clone(&f);
            let mut acc = seed.clone();
            move |value: T| {
                acc = f(&acc, value);
                Step::Emit(acc.clone())
            }
        })
    }
}
