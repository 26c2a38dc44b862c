#![forbid(unsafe_code)]

//! Shallow merging of update payloads into state.
//!
//! A merge replaces top-level entries of the state with those of the patch
//! and keeps every other entry. Nested values are replaced whole, never
//! merged recursively.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::error::MergeError;

/// State types the store can hold.
pub trait ShallowMerge: Clone + 'static {
    /// What an `UPDATE_STATE` action carries.
    type Patch: Clone + 'static;

    /// The state a reset returns to.
    fn empty() -> Self;

    /// A new value with `patch` merged over `self`.
    fn merge(&self, patch: Self::Patch) -> Result<Self, MergeError>;
}

impl<K, V> ShallowMerge for BTreeMap<K, V>
where
    K: Ord + Clone + 'static,
    V: Clone + 'static,
{
    type Patch = BTreeMap<K, V>;

    fn empty() -> Self {
        BTreeMap::new()
    }

    fn merge(&self, patch: Self::Patch) -> Result<Self, MergeError> {
        let mut merged = self.clone();
        merged.extend(patch);
        Ok(merged)
    }
}

impl<K, V, H> ShallowMerge for HashMap<K, V, H>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
    H: BuildHasher + Default + Clone + 'static,
{
    type Patch = HashMap<K, V, H>;

    fn empty() -> Self {
        HashMap::default()
    }

    fn merge(&self, patch: Self::Patch) -> Result<Self, MergeError> {
        let mut merged = self.clone();
        merged.extend(patch);
        Ok(merged)
    }
}

impl<K, V> ShallowMerge for im::OrdMap<K, V>
where
    K: Ord + Clone + 'static,
    V: Clone + 'static,
{
    type Patch = im::OrdMap<K, V>;

    fn empty() -> Self {
        im::OrdMap::new()
    }

    fn merge(&self, patch: Self::Patch) -> Result<Self, MergeError> {
        let mut merged = self.clone();
        for (key, value) in patch {
            merged.insert(key, value);
        }
        Ok(merged)
    }
}

#[cfg(feature = "serde")]
mod json {
    use serde_json::{Map, Value};

    use super::ShallowMerge;
    use crate::error::MergeError;

    pub(crate) fn kind(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    impl ShallowMerge for Map<String, Value> {
        type Patch = Map<String, Value>;

        fn empty() -> Self {
            Map::new()
        }

        fn merge(&self, patch: Self::Patch) -> Result<Self, MergeError> {
            let mut merged = self.clone();
            merged.extend(patch);
            Ok(merged)
        }
    }

    /// Only objects merge. Any other payload or state shape is rejected.
    impl ShallowMerge for Value {
        type Patch = Value;

        fn empty() -> Self {
            Value::Object(Map::new())
        }

        fn merge(&self, patch: Self::Patch) -> Result<Self, MergeError> {
            let Value::Object(current) = self else {
                return Err(MergeError::StateNotObject { found: kind(self) });
            };
            let found = kind(&patch);
            let Value::Object(patch) = patch else {
                return Err(MergeError::PayloadNotObject { found });
            };
            current.merge(patch).map(Value::Object)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn btree_patch_wins_and_keeps_rest() {
        let state = BTreeMap::from([("a", 1), ("b", 2)]);
        let merged = state.merge(BTreeMap::from([("b", 20), ("c", 30)])).unwrap();
        assert_eq!(merged, BTreeMap::from([("a", 1), ("b", 20), ("c", 30)]));
        assert_eq!(state.len(), 2, "original untouched");
    }

    #[test]
    fn hash_map_merge() {
        let state: HashMap<String, i32> = HashMap::from([("x".into(), 1)]);
        let merged = state.merge(HashMap::from([("y".into(), 2)])).unwrap();
        assert_eq!(merged.len(), 2);
        assert!(<HashMap<String, i32>>::empty().is_empty());
    }

    #[test]
    fn ord_map_merge() {
        let state = im::ordmap! {1 => "one", 2 => "two"};
        let merged = state.merge(im::ordmap! {2 => "TWO"}).unwrap();
        assert_eq!(merged.get(&2), Some(&"TWO"));
        assert_eq!(state.get(&2), Some(&"two"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_merge_is_shallow() {
        use serde_json::json;
        let state = json!({"count": 0, "meta": {"a": 1, "b": 2}});
        let merged = state.merge(json!({"meta": {"a": 9}})).unwrap();
        assert_eq!(merged, json!({"count": 0, "meta": {"a": 9}}));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_rejects_non_objects() {
        use serde_json::json;
        assert_eq!(
            json!({}).merge(json!([1, 2])),
            Err(MergeError::PayloadNotObject { found: "array" })
        );
        assert_eq!(
            json!(3).merge(json!({})),
            Err(MergeError::StateNotObject { found: "number" })
        );
        assert_eq!(serde_json::Value::empty(), json!({}));
    }
}
