#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rill_store::{Action, StateStore, StoreConfig};
use rill_stream::Recorder;

#[derive(Arbitrary, Debug)]
enum FuzzAction {
    Update(Vec<(u8, i16)>),
    Reset,
    Undo,
    Redo,
    Unknown,
}

impl FuzzAction {
    fn into_action(self) -> Action<BTreeMap<u8, i16>> {
        match self {
            FuzzAction::Update(pairs) => Action::UpdateState(pairs.into_iter().collect()),
            FuzzAction::Reset => Action::ResetState,
            FuzzAction::Undo => Action::Undo,
            FuzzAction::Redo => Action::Redo,
            FuzzAction::Unknown => Action::Unrecognized("FUZZ".to_owned()),
        }
    }
}

#[derive(Arbitrary, Debug)]
struct Input {
    max_history: u8,
    actions: Vec<FuzzAction>,
}

fuzz_target!(|input: Input| {
    let max = usize::from(input.max_history % 16);
    let store = StateStore::with_config(
        BTreeMap::new(),
        StoreConfig::new().with_max_history_length(max),
    );
    let states = Recorder::attach(&store.state());
    let count = input.actions.len();
    for action in input.actions.into_iter().take(512) {
        let is_update = matches!(action, FuzzAction::Update(_));
        store.dispatch(action.into_action()).expect("map merges never fail");
        let snapshot = store.snapshot();
        assert!(snapshot.history().len() <= max);
        if is_update {
            assert!(snapshot.future().is_empty());
        }
    }
    assert_eq!(states.values().len(), count.min(512) + 1);
});
