//! Optional representations: absence in storage identified with `None`.

use std::collections::BTreeMap;

use duokv_substrate::{KeyValueStore, Primitive};

use crate::Representation;

/// Lifts a representation of `T` into one of `Option<T>`.
///
/// Removing a key, reading a key that was never written, and writing `None`
/// are observably identical:
///
/// - `get` never fails: base-representation absence or decode failure
///   becomes `None`, everything else is wrapped in `Some`.
/// - `set(Some(v))` delegates to the base representation.
/// - `set(None)` removes the slot (the store id or the map key). In array
///   position there is no removable slot, so appending `None` appends
///   nothing.
///
/// Optional-of-Optional is not a supported shape; flattening is the
/// caller's responsibility.
#[derive(Clone, Copy, Debug, Default)]
pub struct OptionalRepr<B> {
    base: B,
}

impl<B> OptionalRepr<B> {
    /// Wrap a base representation.
    pub fn new(base: B) -> Self {
        OptionalRepr { base }
    }
}

impl<B: Representation> Representation for OptionalRepr<B> {
    type Value = Option<B::Value>;

    fn get_from_array(&self, index: usize, array: &[Primitive]) -> Option<Self::Value> {
        Some(self.base.get_from_array(index, array))
    }

    fn append_to_array(&self, value: &Self::Value, array: &mut Vec<Primitive>) {
        if let Some(inner) = value {
            self.base.append_to_array(inner, array);
        }
    }

    fn get_from_map(&self, key: &str, map: &BTreeMap<String, Primitive>) -> Option<Self::Value> {
        Some(self.base.get_from_map(key, map))
    }

    fn set_in_map(
        &self,
        key: &str,
        value: &Self::Value,
        map: &mut BTreeMap<String, Primitive>,
    ) {
        match value {
            Some(inner) => self.base.set_in_map(key, inner, map),
            None => {
                map.remove(key);
            }
        }
    }

    fn get_from_store(&self, id: &str, store: &dyn KeyValueStore) -> Option<Self::Value> {
        Some(self.base.get_from_store(id, store))
    }

    fn set_in_store(&self, id: &str, value: &Self::Value, store: &dyn KeyValueStore) {
        match value {
            Some(inner) => self.base.set_in_store(id, inner, store),
            None => store.remove(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestStore;
    use crate::{PrimitiveRepr, ReprExt};

    #[test]
    fn never_written_reads_as_none() {
        let store = TestStore::default();
        let repr = PrimitiveRepr::<i64>::new().optional();

        assert_eq!(repr.get_from_store("missing", &store), Some(None));
    }

    #[test]
    fn set_none_removes_the_slot() {
        let store = TestStore::default();
        let repr = PrimitiveRepr::<String>::new().optional();

        repr.set_in_store("name", &Some("a".to_string()), &store);
        assert!(store.snapshot().contains_key("name"));

        repr.set_in_store("name", &None, &store);
        assert!(!store.snapshot().contains_key("name"));
        assert_eq!(repr.get_from_store("name", &store), Some(None));
    }

    #[test]
    fn set_none_removes_map_entry() {
        let repr = PrimitiveRepr::<bool>::new().optional();
        let mut map = BTreeMap::new();

        repr.set_in_map("flag", &Some(true), &mut map);
        repr.set_in_map("flag", &None, &mut map);

        assert!(map.is_empty());
    }

    #[test]
    fn decode_failure_reads_as_none() {
        let store = TestStore::default();
        store.set("n", Primitive::Text("oops".into()));

        let repr = PrimitiveRepr::<i64>::new().optional();
        assert_eq!(repr.get_from_store("n", &store), Some(None));
    }

    #[test]
    fn none_in_array_position_appends_nothing() {
        let repr = PrimitiveRepr::<i64>::new().optional();
        let mut array = Vec::new();

        repr.append_to_array(&Some(1), &mut array);
        repr.append_to_array(&None, &mut array);
        repr.append_to_array(&Some(2), &mut array);

        assert_eq!(array, vec![Primitive::Integer(1), Primitive::Integer(2)]);
    }
}
