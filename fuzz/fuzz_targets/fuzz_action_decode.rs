#![no_main]

use libfuzzer_sys::fuzz_target;
use rill_store::{Action, StateStore};
use serde_json::{Value, json};

fuzz_target!(|data: &[u8]| {
    let Ok(action) = serde_json::from_slice::<Action<Value>>(data) else {
        return;
    };
    let encoded = serde_json::to_value(&action).expect("actions always encode");
    let decoded: Action<Value> = serde_json::from_value(encoded).expect("round trip");
    assert_eq!(decoded, action);

    let store = StateStore::new(json!({}));
    let before = store.snapshot();
    if store.dispatch(action).is_err() {
        assert_eq!(store.snapshot(), before);
    }
});
