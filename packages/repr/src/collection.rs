//! Collection representations: homogeneous sequences and string-keyed maps.

use std::collections::BTreeMap;

use duokv_substrate::{KeyValueStore, Primitive};

use crate::Representation;

/// Lifts an element representation into one of `Vec<Element>`, stored as a
/// substrate array.
///
/// Decode is strict: if any substrate element fails to decode, the whole
/// collection decode yields nothing - elements are never silently dropped
/// on the way out. Encode is lenient: elements whose encoding fails are
/// omitted from the written array. The asymmetry is deliberate; each
/// omission is logged.
///
/// Nested shapes (array-of-array, map-of-array) recurse structurally: the
/// element representation is itself a collection representation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArrayRepr<E> {
    element: E,
}

impl<E> ArrayRepr<E> {
    /// Wrap an element representation.
    pub fn new(element: E) -> Self {
        ArrayRepr { element }
    }
}

impl<E: Representation> ArrayRepr<E> {
    fn decode_elements(&self, items: &[Primitive]) -> Option<Vec<E::Value>> {
        (0..items.len())
            .map(|index| self.element.get_from_array(index, items))
            .collect()
    }

    fn encode_elements(&self, values: &[E::Value]) -> Vec<Primitive> {
        let mut out = Vec::with_capacity(values.len());
        for value in values {
            let before = out.len();
            self.element.append_to_array(value, &mut out);
            if out.len() == before {
                log::debug!("array element encode produced nothing; element omitted");
            }
        }
        out
    }
}

impl<E: Representation> Representation for ArrayRepr<E> {
    type Value = Vec<E::Value>;

    fn get_from_array(&self, index: usize, array: &[Primitive]) -> Option<Self::Value> {
        array
            .get(index)
            .and_then(Primitive::as_array)
            .and_then(|items| self.decode_elements(items))
    }

    fn append_to_array(&self, value: &Self::Value, array: &mut Vec<Primitive>) {
        array.push(Primitive::Array(self.encode_elements(value)));
    }

    fn get_from_map(&self, key: &str, map: &BTreeMap<String, Primitive>) -> Option<Self::Value> {
        map.get(key)
            .and_then(Primitive::as_array)
            .and_then(|items| self.decode_elements(items))
    }

    fn set_in_map(&self, key: &str, value: &Self::Value, map: &mut BTreeMap<String, Primitive>) {
        map.insert(key.to_string(), Primitive::Array(self.encode_elements(value)));
    }

    fn get_from_store(&self, id: &str, store: &dyn KeyValueStore) -> Option<Self::Value> {
        match store.get(id)? {
            Primitive::Array(items) => self.decode_elements(&items),
            _ => None,
        }
    }

    fn set_in_store(&self, id: &str, value: &Self::Value, store: &dyn KeyValueStore) {
        store.set(id, Primitive::Array(self.encode_elements(value)));
    }
}

/// Lifts an element representation into one of `BTreeMap<String, Element>`,
/// stored as a substrate map.
///
/// Semantics are identical to [`ArrayRepr`] keyed by string instead of
/// ordered by position: strict decode, lenient encode, structural recursion.
/// Map key identity is preserved, never recomputed.
#[derive(Clone, Copy, Debug, Default)]
pub struct MapRepr<E> {
    element: E,
}

impl<E> MapRepr<E> {
    /// Wrap an element representation.
    pub fn new(element: E) -> Self {
        MapRepr { element }
    }
}

impl<E: Representation> MapRepr<E> {
    fn decode_entries(
        &self,
        entries: &BTreeMap<String, Primitive>,
    ) -> Option<BTreeMap<String, E::Value>> {
        entries
            .keys()
            .map(|key| {
                self.element
                    .get_from_map(key, entries)
                    .map(|value| (key.clone(), value))
            })
            .collect()
    }

    fn encode_entries(&self, values: &BTreeMap<String, E::Value>) -> BTreeMap<String, Primitive> {
        let mut out = BTreeMap::new();
        for (key, value) in values {
            self.element.set_in_map(key, value, &mut out);
            if !out.contains_key(key) {
                log::debug!("map entry {key:?} encode produced nothing; entry omitted");
            }
        }
        out
    }
}

impl<E: Representation> Representation for MapRepr<E> {
    type Value = BTreeMap<String, E::Value>;

    fn get_from_array(&self, index: usize, array: &[Primitive]) -> Option<Self::Value> {
        array
            .get(index)
            .and_then(Primitive::as_map)
            .and_then(|entries| self.decode_entries(entries))
    }

    fn append_to_array(&self, value: &Self::Value, array: &mut Vec<Primitive>) {
        array.push(Primitive::Map(self.encode_entries(value)));
    }

    fn get_from_map(&self, key: &str, map: &BTreeMap<String, Primitive>) -> Option<Self::Value> {
        map.get(key)
            .and_then(Primitive::as_map)
            .and_then(|entries| self.decode_entries(entries))
    }

    fn set_in_map(&self, key: &str, value: &Self::Value, map: &mut BTreeMap<String, Primitive>) {
        map.insert(key.to_string(), Primitive::Map(self.encode_entries(value)));
    }

    fn get_from_store(&self, id: &str, store: &dyn KeyValueStore) -> Option<Self::Value> {
        match store.get(id)? {
            Primitive::Map(entries) => self.decode_entries(&entries),
            _ => None,
        }
    }

    fn set_in_store(&self, id: &str, value: &Self::Value, store: &dyn KeyValueStore) {
        store.set(id, Primitive::Map(self.encode_entries(value)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestStore;
    use crate::{PrimitiveRepr, ReprExt};

    #[test]
    fn array_roundtrip() {
        let store = TestStore::default();
        let repr = PrimitiveRepr::<String>::new().as_array();

        let values = vec!["a".to_string(), "b".to_string()];
        repr.set_in_store("names", &values, &store);

        assert_eq!(
            store.get("names"),
            Some(Primitive::Array(vec![
                Primitive::Text("a".into()),
                Primitive::Text("b".into()),
            ]))
        );
        assert_eq!(repr.get_from_store("names", &store), Some(values));
    }

    #[test]
    fn empty_array_roundtrip() {
        let store = TestStore::default();
        let repr = PrimitiveRepr::<i64>::new().as_array();

        repr.set_in_store("empty", &Vec::new(), &store);
        assert_eq!(repr.get_from_store("empty", &store), Some(Vec::new()));
    }

    #[test]
    fn one_bad_element_fails_the_whole_decode() {
        let store = TestStore::default();
        store.set(
            "mixed",
            Primitive::Array(vec![Primitive::Integer(1), Primitive::Text("two".into())]),
        );

        let repr = PrimitiveRepr::<i64>::new().as_array();
        assert_eq!(repr.get_from_store("mixed", &store), None);
    }

    #[test]
    fn encode_omits_failing_elements() {
        let store = TestStore::default();
        let positive = PrimitiveRepr::<i64>::new()
            .proxied(|v: &i64| (*v > 0).then_some(*v), Some)
            .as_array();

        positive.set_in_store("nums", &vec![1, -2, 3], &store);

        assert_eq!(
            store.get("nums"),
            Some(Primitive::Array(vec![
                Primitive::Integer(1),
                Primitive::Integer(3),
            ]))
        );
    }

    #[test]
    fn nested_arrays_recurse() {
        let store = TestStore::default();
        let repr = PrimitiveRepr::<i64>::new().as_array().as_array();

        let values = vec![vec![1, 2], vec![], vec![3]];
        repr.set_in_store("grid", &values, &store);
        assert_eq!(repr.get_from_store("grid", &store), Some(values));
    }

    #[test]
    fn map_roundtrip_preserves_keys() {
        let store = TestStore::default();
        let repr = PrimitiveRepr::<i64>::new().as_map();

        let mut values = BTreeMap::new();
        values.insert("one".to_string(), 1);
        values.insert("two".to_string(), 2);
        repr.set_in_store("counts", &values, &store);

        assert_eq!(repr.get_from_store("counts", &store), Some(values));
    }

    #[test]
    fn map_strict_decode() {
        let store = TestStore::default();
        let mut entries = BTreeMap::new();
        entries.insert("good".to_string(), Primitive::Bool(true));
        entries.insert("bad".to_string(), Primitive::Integer(1));
        store.set("flags", Primitive::Map(entries));

        let repr = PrimitiveRepr::<bool>::new().as_map();
        assert_eq!(repr.get_from_store("flags", &store), None);
    }

    #[test]
    fn map_of_arrays_recurse() {
        let store = TestStore::default();
        let repr = PrimitiveRepr::<String>::new().as_array().as_map();

        let mut values = BTreeMap::new();
        values.insert("tags".to_string(), vec!["x".to_string(), "y".to_string()]);
        repr.set_in_store("by_group", &values, &store);

        assert_eq!(repr.get_from_store("by_group", &store), Some(values));
    }

    #[test]
    fn wrong_shape_in_store_is_none() {
        let store = TestStore::default();
        store.set("not_a_list", Primitive::Integer(1));

        let repr = PrimitiveRepr::<i64>::new().as_array();
        assert_eq!(repr.get_from_store("not_a_list", &store), None);
    }
}
