//! Shared value/registration state for the reference stores.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use duokv_substrate::Primitive;

/// Explicit values plus the registered-defaults overlay.
///
/// The overlay is consulted only when no explicit value exists. First
/// registration of an id wins; registering never touches explicit values.
#[derive(Default)]
pub(crate) struct StoreState {
    values: BTreeMap<String, Primitive>,
    registered: BTreeMap<String, Primitive>,
}

impl StoreState {
    pub(crate) fn get(&self, id: &str) -> Option<Primitive> {
        self.values
            .get(id)
            .or_else(|| self.registered.get(id))
            .cloned()
    }

    pub(crate) fn set(&mut self, id: &str, value: Primitive) {
        self.values.insert(id.to_string(), value);
    }

    /// Remove an explicit value. Returns whether anything was removed.
    pub(crate) fn remove(&mut self, id: &str) -> bool {
        self.values.remove(id).is_some()
    }

    pub(crate) fn register(&mut self, id: &str, value: Primitive) {
        self.registered.entry(id.to_string()).or_insert(value);
    }

    /// Registered defaults overlaid by explicit values.
    pub(crate) fn snapshot(&self) -> BTreeMap<String, Primitive> {
        let mut merged = self.registered.clone();
        merged.extend(self.values.clone());
        merged
    }

    /// The explicit values alone (what a disk store persists).
    pub(crate) fn explicit_values(&self) -> &BTreeMap<String, Primitive> {
        &self.values
    }

    pub(crate) fn replace_explicit_values(&mut self, values: BTreeMap<String, Primitive>) {
        self.values = values;
    }
}

/// Lock a mutex, recovering the guard if a panicking observer poisoned it.
pub(crate) fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_value_shadows_registered_default() {
        let mut state = StoreState::default();
        state.register("k", Primitive::Integer(1));
        assert_eq!(state.get("k"), Some(Primitive::Integer(1)));

        state.set("k", Primitive::Integer(2));
        assert_eq!(state.get("k"), Some(Primitive::Integer(2)));

        state.remove("k");
        assert_eq!(state.get("k"), Some(Primitive::Integer(1)));
    }

    #[test]
    fn snapshot_merges_with_explicit_winning() {
        let mut state = StoreState::default();
        state.register("a", Primitive::Integer(1));
        state.register("b", Primitive::Integer(2));
        state.set("b", Primitive::Integer(20));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.get("a"), Some(&Primitive::Integer(1)));
        assert_eq!(snapshot.get("b"), Some(&Primitive::Integer(20)));
    }

    #[test]
    fn first_registration_wins() {
        let mut state = StoreState::default();
        state.register("k", Primitive::Integer(1));
        state.register("k", Primitive::Integer(9));
        assert_eq!(state.get("k"), Some(Primitive::Integer(1)));
    }
}
