//! In-memory local store with synchronous per-key observation.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use duokv_substrate::{KeyObserver, KeyValueStore, LocalStore, ObservationToken, Primitive};

use crate::state::{lock_recovering, StoreState};

/// An in-memory [`LocalStore`].
///
/// Mutations of an observed key invoke its observers synchronously on the
/// mutating thread, with all internal locks released, so an observer may
/// re-read the store or adjust observations. No value diffing is
/// performed: setting a key to its current value still notifies.
///
/// # Example
///
/// ```rust
/// use duokv_memstore::MemoryLocalStore;
/// use duokv_substrate::{KeyValueStore, Primitive};
///
/// let store = MemoryLocalStore::new();
/// store.set("greeting", Primitive::from("hello"));
/// assert_eq!(store.get("greeting"), Some(Primitive::from("hello")));
/// ```
#[derive(Default)]
pub struct MemoryLocalStore {
    state: Mutex<StoreState>,
    observers: Mutex<HashMap<String, Vec<(ObservationToken, KeyObserver)>>>,
    next_token: AtomicU64,
}

impl MemoryLocalStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn notify(&self, id: &str) {
        let observers: Vec<KeyObserver> = lock_recovering(&self.observers)
            .get(id)
            .map(|list| list.iter().map(|(_, o)| o.clone()).collect())
            .unwrap_or_default();

        for observer in observers {
            observer();
        }
    }

    pub(crate) fn explicit_values(&self) -> BTreeMap<String, Primitive> {
        lock_recovering(&self.state).explicit_values().clone()
    }

    pub(crate) fn replace_explicit_values(&self, values: BTreeMap<String, Primitive>) {
        lock_recovering(&self.state).replace_explicit_values(values);
    }
}

impl KeyValueStore for MemoryLocalStore {
    fn get(&self, id: &str) -> Option<Primitive> {
        lock_recovering(&self.state).get(id)
    }

    fn set(&self, id: &str, value: Primitive) {
        lock_recovering(&self.state).set(id, value);
        self.notify(id);
    }

    fn remove(&self, id: &str) {
        let removed = lock_recovering(&self.state).remove(id);
        if removed {
            self.notify(id);
        }
    }

    fn snapshot(&self) -> BTreeMap<String, Primitive> {
        lock_recovering(&self.state).snapshot()
    }

    fn register_default(&self, id: &str, value: Primitive) {
        lock_recovering(&self.state).register(id, value);
    }
}

impl LocalStore for MemoryLocalStore {
    fn observe_key(&self, id: &str, observer: KeyObserver) -> ObservationToken {
        let token = ObservationToken::new(self.next_token.fetch_add(1, Ordering::Relaxed));
        lock_recovering(&self.observers)
            .entry(id.to_string())
            .or_default()
            .push((token, observer));
        token
    }

    fn unobserve_key(&self, id: &str, token: ObservationToken) {
        let mut observers = lock_recovering(&self.observers);
        match observers.get_mut(id) {
            Some(list) => {
                let before = list.len();
                list.retain(|(t, _)| *t != token);
                if list.len() == before {
                    log::debug!("unobserve for {id:?} with unknown token; ignoring");
                }
            }
            None => log::debug!("unobserve for unobserved key {id:?}; ignoring"),
        }
    }
}
