#![forbid(unsafe_code)]

//! Rill public facade crate.
//!
//! Re-exports the stream engine and the state store under one name. Most
//! applications only need the prelude.

pub use rill_stream as stream;

#[cfg(feature = "store")]
pub use rill_store as store;

pub mod prelude {
    pub use rill_stream::operators;
    pub use rill_stream::{
        Disposer, Emitter, Observer, Promise, Resolver, Signal, Sink, Source, StreamError,
        Subject, Subscription, Talkback, combine, combine2, combine3, create_source, empty,
        from_array, from_iter, from_promise,
    };

    #[cfg(feature = "store")]
    pub use rill_store::{
        Action, ShallowMerge, StateStore, StoreConfig, StoreError, StoreState,
        create_state_store, state_reducer,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn prelude_covers_a_pipeline() {
        let doubled = from_array(vec![1, 2, 3]).pipe(operators::map(|x: i32| x * 2));
        let rec = crate::stream::Recorder::attach(&doubled);
        assert_eq!(rec.values(), vec![2, 4, 6]);
    }

    #[cfg(feature = "store")]
    #[test]
    fn prelude_covers_a_store() {
        use std::collections::BTreeMap;
        let store = create_state_store(BTreeMap::from([("n", 0)]), Some(1));
        store.update_state(BTreeMap::from([("n", 1)])).unwrap();
        store.update_state(BTreeMap::from([("n", 2)])).unwrap();
        store.dispatch(Action::Undo).unwrap();
        store.dispatch(Action::Undo).unwrap();
        assert_eq!(store.snapshot().current().get("n"), Some(&1));
    }
}
