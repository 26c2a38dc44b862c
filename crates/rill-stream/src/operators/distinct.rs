#![forbid(unsafe_code)]

use super::lift::{Step, lift};
use crate::source::Source;

impl<T: Clone + PartialEq + 'static> Source<T> {
    /// Drop values equal to the previously emitted one.
    #[must_use]
    pub fn distinct_until_changed(self) -> Source<T> {
        lift(self, || {
            let mut last: Option<T> = None;
            move |value: T| {
                if last.as_ref() == Some(&value) {
                    Step::Skip
                } else {
                    last = Some(value.clone());
                    Step::Emit(value)
                }
            }
        })
    }
}
