//! The Representation trait and its combinator extension.

use std::collections::BTreeMap;
use std::sync::Arc;

use duokv_substrate::{KeyValueStore, Primitive};

use crate::{ArrayRepr, MapRepr, OptionalRepr, ProxyRepr};

/// A bidirectional mapping between a domain `Value` and the substrate
/// shapes the stores accept.
///
/// One method pair exists per substrate shape: positional array element,
/// string-keyed map entry, and store slot. The two store kinds share one
/// primitive surface ([`KeyValueStore`]), so the store-shape methods address
/// either store uniformly.
///
/// # Contract
///
/// - A get after a set with the same key and store yields a value equal to
///   the one set, unless the store independently lost the entry. No
///   atomicity promise is made beyond the single call.
/// - Decode failure and absence are both `None`; no error channel crosses
///   this boundary.
/// - Encode failure drops the write: no partial or corrupt write is ever
///   performed.
///
/// # Object Safety
///
/// Object-safe at a fixed value type: `Arc<dyn Representation<Value = V>>`
/// is how heterogeneous typed keys hold their codec. Composition below that
/// boundary is statically dispatched.
pub trait Representation: Send + Sync {
    /// The domain type this representation persists.
    type Value;

    /// Decode the element at `index` of a substrate array.
    fn get_from_array(&self, index: usize, array: &[Primitive]) -> Option<Self::Value>;

    /// Encode `value` and append it to a substrate array.
    ///
    /// If encoding fails, nothing is appended.
    fn append_to_array(&self, value: &Self::Value, array: &mut Vec<Primitive>);

    /// Decode the entry under `key` of a substrate map.
    fn get_from_map(&self, key: &str, map: &BTreeMap<String, Primitive>) -> Option<Self::Value>;

    /// Encode `value` into the entry under `key` of a substrate map.
    ///
    /// If encoding fails, the map is left untouched.
    fn set_in_map(&self, key: &str, value: &Self::Value, map: &mut BTreeMap<String, Primitive>);

    /// Decode the slot under `id` of a store.
    fn get_from_store(&self, id: &str, store: &dyn KeyValueStore) -> Option<Self::Value>;

    /// Encode `value` into the slot under `id` of a store.
    ///
    /// If encoding fails, no write is performed.
    fn set_in_store(&self, id: &str, value: &Self::Value, store: &dyn KeyValueStore);
}

/// Combinators for building composed representations by chaining.
///
/// Automatically implemented for every `Representation`.
pub trait ReprExt: Representation + Sized {
    /// Persist a `V` through this representation's value as a proxy.
    ///
    /// Both directions are partial: `to` returning `None` drops the write,
    /// `from` returning `None` makes the decode yield nothing.
    fn proxied<V, T, F>(self, to: T, from: F) -> ProxyRepr<Self, V>
    where
        T: Fn(&V) -> Option<Self::Value> + Send + Sync + 'static,
        F: Fn(Self::Value) -> Option<V> + Send + Sync + 'static,
    {
        ProxyRepr::new(self, to, from)
    }

    /// Lift into a representation of `Option<Value>`, identifying `None`
    /// with absence in storage.
    fn optional(self) -> OptionalRepr<Self> {
        OptionalRepr::new(self)
    }

    /// Lift into a representation of `Vec<Value>` over a substrate array.
    fn as_array(self) -> ArrayRepr<Self> {
        ArrayRepr::new(self)
    }

    /// Lift into a representation of `BTreeMap<String, Value>` over a
    /// substrate map.
    fn as_map(self) -> MapRepr<Self> {
        MapRepr::new(self)
    }
}

impl<R: Representation> ReprExt for R {}

// Blanket implementations for smart pointers, so a shared representation
// can be reused across keys.

impl<R: Representation + ?Sized> Representation for Arc<R> {
    type Value = R::Value;

    fn get_from_array(&self, index: usize, array: &[Primitive]) -> Option<Self::Value> {
        (**self).get_from_array(index, array)
    }

    fn append_to_array(&self, value: &Self::Value, array: &mut Vec<Primitive>) {
        (**self).append_to_array(value, array)
    }

    fn get_from_map(&self, key: &str, map: &BTreeMap<String, Primitive>) -> Option<Self::Value> {
        (**self).get_from_map(key, map)
    }

    fn set_in_map(&self, key: &str, value: &Self::Value, map: &mut BTreeMap<String, Primitive>) {
        (**self).set_in_map(key, value, map)
    }

    fn get_from_store(&self, id: &str, store: &dyn KeyValueStore) -> Option<Self::Value> {
        (**self).get_from_store(id, store)
    }

    fn set_in_store(&self, id: &str, value: &Self::Value, store: &dyn KeyValueStore) {
        (**self).set_in_store(id, value, store)
    }
}

impl<R: Representation + ?Sized> Representation for Box<R> {
    type Value = R::Value;

    fn get_from_array(&self, index: usize, array: &[Primitive]) -> Option<Self::Value> {
        (**self).get_from_array(index, array)
    }

    fn append_to_array(&self, value: &Self::Value, array: &mut Vec<Primitive>) {
        (**self).append_to_array(value, array)
    }

    fn get_from_map(&self, key: &str, map: &BTreeMap<String, Primitive>) -> Option<Self::Value> {
        (**self).get_from_map(key, map)
    }

    fn set_in_map(&self, key: &str, value: &Self::Value, map: &mut BTreeMap<String, Primitive>) {
        (**self).set_in_map(key, value, map)
    }

    fn get_from_store(&self, id: &str, store: &dyn KeyValueStore) -> Option<Self::Value> {
        (**self).get_from_store(id, store)
    }

    fn set_in_store(&self, id: &str, value: &Self::Value, store: &dyn KeyValueStore) {
        (**self).set_in_store(id, value, store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TestStore;
    use crate::PrimitiveRepr;

    #[test]
    fn trait_object_at_fixed_value_type() {
        let repr: Arc<dyn Representation<Value = i64>> = Arc::new(PrimitiveRepr::<i64>::new());
        let store = TestStore::default();

        repr.set_in_store("n", &42, &store);
        assert_eq!(repr.get_from_store("n", &store), Some(42));
    }

    #[test]
    fn boxed_representation_delegates() {
        let repr = Box::new(PrimitiveRepr::<String>::new());
        let mut map = BTreeMap::new();

        repr.set_in_map("s", &"x".to_string(), &mut map);
        assert_eq!(repr.get_from_map("s", &map), Some("x".to_string()));
    }
}
