//! Bulk registration of key defaults into a store's registration domain.

use std::collections::HashSet;

use duokv_substrate::{KeyValueStore, Primitive};

use crate::Key;

/// Type-erased view of a key for bulk defaults registration.
///
/// Implemented by every [`Key`]; heterogeneous keys can be gathered into
/// one registration list:
///
/// ```rust
/// use duokv_typed::{register_defaults, Key, RegistrableKey, RegistrationOptions};
/// use duokv_repr::PrimitiveRepr;
/// use duokv_memstore::MemoryLocalStore;
///
/// let retries = Key::new("retryCount", 3i64, PrimitiveRepr::new());
/// let greeting = Key::new("greeting", "hi".to_string(), PrimitiveRepr::new());
///
/// let store = MemoryLocalStore::new();
/// register_defaults(
///     &store,
///     &[&retries as &dyn RegistrableKey, &greeting],
///     RegistrationOptions::default(),
/// );
/// assert_eq!(retries.get(&store), 3);
/// ```
pub trait RegistrableKey: Send + Sync {
    /// The stable identifier to register under.
    fn id(&self) -> &str;

    /// The encoded default, if the default has an encoding.
    fn encoded_default(&self) -> Option<Primitive>;
}

impl<V: Clone + Send + Sync> RegistrableKey for Key<V> {
    fn id(&self) -> &str {
        Key::id(self)
    }

    fn encoded_default(&self) -> Option<Primitive> {
        Key::encoded_default(self)
    }
}

/// Configuration for a defaults-registration pass.
///
/// Threaded explicitly into [`register_defaults`] rather than living in
/// process-wide state, so test harnesses can vary it per call.
#[derive(Clone, Copy, Debug, Default)]
pub struct RegistrationOptions {
    /// Treat a duplicate identifier within one batch as a programmer
    /// error: asserts in debug builds, logs and skips the duplicate in
    /// release builds.
    pub require_unique_ids: bool,
}

/// Write each key's encoded default into the store's registration domain.
///
/// The registration domain is a soft overlay consulted only when no
/// explicit value is stored; registering never overwrites an
/// explicitly-set value. Keys whose default has no encoding register
/// nothing.
pub fn register_defaults(
    store: &dyn KeyValueStore,
    keys: &[&dyn RegistrableKey],
    options: RegistrationOptions,
) {
    let mut seen: HashSet<&str> = HashSet::with_capacity(keys.len());

    for key in keys {
        if options.require_unique_ids && !seen.insert(key.id()) {
            debug_assert!(false, "duplicate key id in registration batch: {}", key.id());
            log::warn!(
                "duplicate key id {:?} in registration batch; skipping",
                key.id()
            );
            continue;
        }

        match key.encoded_default() {
            Some(default) => store.register_default(key.id(), default),
            None => log::debug!("key {:?} default has no encoding; nothing registered", key.id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duokv_memstore::MemoryLocalStore;
    use duokv_repr::{PrimitiveRepr, ReprExt};

    #[test]
    fn registered_default_backs_get() {
        let store = MemoryLocalStore::new();
        let retries = Key::new("retryCount", 3i64, PrimitiveRepr::new());

        register_defaults(&store, &[&retries], RegistrationOptions::default());

        assert_eq!(store.get("retryCount"), Some(Primitive::Integer(3)));
    }

    #[test]
    fn registration_never_overwrites_explicit_value() {
        let store = MemoryLocalStore::new();
        let retries = Key::new("retryCount", 3i64, PrimitiveRepr::new());

        retries.set(&store, &9);
        register_defaults(&store, &[&retries], RegistrationOptions::default());

        assert_eq!(retries.get(&store), 9);
    }

    #[test]
    fn heterogeneous_batch_registers_each_key() {
        let store = MemoryLocalStore::new();
        let retries = Key::new("retryCount", 3i64, PrimitiveRepr::new());
        let greeting = Key::new("greeting", "hello".to_string(), PrimitiveRepr::new());

        register_defaults(
            &store,
            &[&retries as &dyn RegistrableKey, &greeting],
            RegistrationOptions::default(),
        );

        let snapshot = store.snapshot();
        assert_eq!(snapshot.get("retryCount"), Some(&Primitive::Integer(3)));
        assert_eq!(
            snapshot.get("greeting"),
            Some(&Primitive::Text("hello".into()))
        );
    }

    #[test]
    fn optional_none_default_registers_nothing() {
        let store = MemoryLocalStore::new();
        let maybe: Key<Option<i64>> = Key::new("maybe", None, PrimitiveRepr::new().optional());

        register_defaults(&store, &[&maybe], RegistrationOptions::default());

        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn duplicates_allowed_when_uniqueness_not_required() {
        let store = MemoryLocalStore::new();
        let a = Key::new("slot", 1i64, PrimitiveRepr::new());
        let b = Key::new("slot", 2i64, PrimitiveRepr::new());

        register_defaults(
            &store,
            &[&a as &dyn RegistrableKey, &b],
            RegistrationOptions {
                require_unique_ids: false,
            },
        );

        // First registration wins; the overlay is never overwritten by a
        // later register.
        assert_eq!(store.get("slot"), Some(Primitive::Integer(1)));
    }
}
