//! The Key type - a typed, identifier-bound handle over stored data.

use std::collections::BTreeMap;
use std::sync::Arc;

use duokv_repr::Representation;
use duokv_substrate::{KeyValueStore, Primitive};

/// A typed handle combining a stable identifier, a default value, and a
/// resolved representation.
///
/// Keys are constructed once, typically as constant definitions, and are
/// immutable thereafter. The key itself is never stored - it addresses
/// exactly one string-identified slot in whichever store it is used
/// against, regardless of how its representation is composed.
///
/// `get` substitutes the default on absence *and* on decode failure; the
/// two are deliberately indistinguishable to callers. `set` with a value
/// whose encoding fails is a silent no-op at this layer, leaving any prior
/// value in place.
///
/// The representation is held as a trait object: this is the one boundary
/// where heterogeneous keys must live in homogeneous collections (e.g. for
/// bulk defaults registration), so dynamic dispatch is confined here.
pub struct Key<V> {
    id: String,
    default: V,
    repr: Arc<dyn Representation<Value = V>>,
}

impl<V: Clone> Key<V> {
    /// Bind an identifier, default value, and representation.
    pub fn new(
        id: impl Into<String>,
        default: V,
        repr: impl Representation<Value = V> + 'static,
    ) -> Self {
        Key {
            id: id.into(),
            default,
            repr: Arc::new(repr),
        }
    }

    /// The stable identifier this key occupies in a store.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The value `get` falls back to.
    pub fn default_value(&self) -> &V {
        &self.default
    }

    /// Read the key from a store, substituting the default on absence or
    /// decode failure.
    pub fn get(&self, store: &dyn KeyValueStore) -> V {
        self.repr
            .get_from_store(&self.id, store)
            .unwrap_or_else(|| self.default.clone())
    }

    /// Write the key to a store.
    ///
    /// If the value's encoding fails, no write occurs and a later `get`
    /// returns the prior value or the default.
    pub fn set(&self, store: &dyn KeyValueStore, value: &V) {
        self.repr.set_in_store(&self.id, value, store);
    }

    /// Remove the key's slot from a store.
    pub fn remove(&self, store: &dyn KeyValueStore) {
        store.remove(&self.id);
    }

    /// The default value encoded by this key's representation, if it has
    /// an encoding.
    ///
    /// Used by defaults registration. A default with no encoding (for
    /// example an optional key defaulting to `None`) yields nothing.
    pub fn encoded_default(&self) -> Option<Primitive> {
        let mut staging = BTreeMap::new();
        self.repr.set_in_map(&self.id, &self.default, &mut staging);
        staging.remove(&self.id)
    }
}

impl<V> Clone for Key<V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        Key {
            id: self.id.clone(),
            default: self.default.clone(),
            repr: self.repr.clone(),
        }
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for Key<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Key")
            .field("id", &self.id)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}
