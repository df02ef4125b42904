//! Debug-build-only mutable keys.

use duokv_substrate::KeyValueStore;

use crate::Key;

/// A key whose mutations only take effect in debug builds.
///
/// Lets product code reference instrumentation toggles without shipping
/// their mutability: in release builds `set` and `remove` are no-ops and
/// `get` always returns the configured default, regardless of anything a
/// store might contain.
pub struct DebugKey<V> {
    inner: Key<V>,
}

impl<V: Clone> DebugKey<V> {
    /// Wrap an existing key.
    pub fn new(inner: Key<V>) -> Self {
        DebugKey { inner }
    }

    /// The stable identifier.
    pub fn id(&self) -> &str {
        self.inner.id()
    }

    /// Read the key. In release builds this is always the default.
    pub fn get(&self, store: &dyn KeyValueStore) -> V {
        #[cfg(debug_assertions)]
        {
            self.inner.get(store)
        }
        #[cfg(not(debug_assertions))]
        {
            let _ = store;
            self.inner.default_value().clone()
        }
    }

    /// Write the key. No-op in release builds.
    pub fn set(&self, store: &dyn KeyValueStore, value: &V) {
        #[cfg(debug_assertions)]
        {
            self.inner.set(store, value);
        }
        #[cfg(not(debug_assertions))]
        {
            let _ = (store, value);
            log::trace!("debug key {:?} set ignored in release build", self.id());
        }
    }

    /// Remove the key's slot. No-op in release builds.
    pub fn remove(&self, store: &dyn KeyValueStore) {
        #[cfg(debug_assertions)]
        {
            self.inner.remove(store);
        }
        #[cfg(not(debug_assertions))]
        {
            let _ = store;
            log::trace!("debug key {:?} remove ignored in release build", self.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duokv_memstore::MemoryLocalStore;
    use duokv_repr::PrimitiveRepr;

    // Test binaries are debug builds, so the observable behavior here is
    // the delegating branch; the release branch pins the default by
    // construction.
    #[cfg(debug_assertions)]
    #[test]
    fn mutations_apply_in_debug_builds() {
        let store = MemoryLocalStore::new();
        let verbose = DebugKey::new(Key::new("verboseLogging", false, PrimitiveRepr::new()));

        assert!(!verbose.get(&store));
        verbose.set(&store, &true);
        assert!(verbose.get(&store));
        verbose.remove(&store);
        assert!(!verbose.get(&store));
    }

    #[test]
    fn exposes_inner_id() {
        let verbose = DebugKey::new(Key::new("verboseLogging", false, PrimitiveRepr::new()));
        assert_eq!(verbose.id(), "verboseLogging");
    }
}
