//! Shared in-crate test helpers.

use std::collections::BTreeMap;
use std::sync::Mutex;

use duokv_substrate::{KeyValueStore, Primitive};

/// Minimal store backing for representation tests.
#[derive(Default)]
pub(crate) struct TestStore {
    entries: Mutex<BTreeMap<String, Primitive>>,
}

impl KeyValueStore for TestStore {
    fn get(&self, id: &str) -> Option<Primitive> {
        self.entries.lock().unwrap().get(id).cloned()
    }

    fn set(&self, id: &str, value: Primitive) {
        self.entries.lock().unwrap().insert(id.to_string(), value);
    }

    fn remove(&self, id: &str) {
        self.entries.lock().unwrap().remove(id);
    }

    fn snapshot(&self) -> BTreeMap<String, Primitive> {
        self.entries.lock().unwrap().clone()
    }

    fn register_default(&self, id: &str, value: Primitive) {
        self.entries
            .lock()
            .unwrap()
            .entry(id.to_string())
            .or_insert(value);
    }
}
