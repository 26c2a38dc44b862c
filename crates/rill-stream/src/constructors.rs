#![forbid(unsafe_code)]

//! Synchronous source constructors.

use std::rc::Rc;

use crate::disposer::Disposer;
use crate::source::{Source, create_source};

/// Emit each element in order, then complete.
///
/// Emission happens synchronously during subscription. If the subscriber
/// cancels part-way, the remaining elements are not emitted.
#[must_use]
pub fn from_array<T: Clone + 'static>(values: Vec<T>) -> Source<T> {
    let values: Rc<[T]> = values.into();
    create_source(move |emitter| {
        for value in values.iter() {
            if emitter.is_closed() {
                break;
            }
            emitter.next(value.clone());
        }
        emitter.complete();
        Ok(Disposer::noop())
    })
}

/// Like [`from_array`], collecting the iterator once up front.
#[must_use]
pub fn from_iter<T, I>(values: I) -> Source<T>
where
    T: Clone + 'static,
    I: IntoIterator<Item = T>,
{
    from_array(values.into_iter().collect())
}

/// A source that completes immediately.
#[must_use]
pub fn empty<T: 'static>() -> Source<T> {
    create_source(|emitter| {
        emitter.complete();
        Ok(Disposer::noop())
    })
}
