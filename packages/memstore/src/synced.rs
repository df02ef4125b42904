//! In-memory synchronized store with changed-keys broadcasts.

use std::collections::BTreeMap;
use std::sync::Mutex;

use duokv_substrate::{
    BroadcastHub, ChangeOrigin, KeyChangeNotice, KeyValueStore, NoticeObserver, Primitive,
    SubscriptionId, SyncedStore,
};

use crate::state::{lock_recovering, StoreState};

/// An in-memory [`SyncedStore`].
///
/// Mirrors the observation model of an eventually-consistent,
/// cloud-synchronized store: genuine external changes arrive through
/// [`apply_external_changes`] and are broadcast under
/// [`ChangeOrigin::External`]; every successful in-process `set`/`remove`
/// synthesizes a [`ChangeOrigin::Internal`] notice with the same payload
/// shape, so subscribers cannot distinguish origin.
///
/// The synthesized notice is best-effort and carries no ordering promise.
/// Read-after-write consistency comes from `get`, not from notices.
///
/// [`apply_external_changes`]: MemorySyncedStore::apply_external_changes
#[derive(Default)]
pub struct MemorySyncedStore {
    state: Mutex<StoreState>,
    hub: BroadcastHub,
}

impl MemorySyncedStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a batch of changes that originated outside the process.
    ///
    /// A `None` value removes the entry. One [`ChangeOrigin::External`]
    /// notice is posted for the whole batch, bundling every changed key
    /// identifier.
    pub fn apply_external_changes(
        &self,
        changes: impl IntoIterator<Item = (String, Option<Primitive>)>,
    ) {
        let mut changed_ids = Vec::new();
        {
            let mut state = lock_recovering(&self.state);
            for (id, value) in changes {
                match value {
                    Some(value) => state.set(&id, value),
                    None => {
                        state.remove(&id);
                    }
                }
                changed_ids.push(id);
            }
        }

        if !changed_ids.is_empty() {
            self.hub
                .post(ChangeOrigin::External, &KeyChangeNotice::new(changed_ids));
        }
    }
}

impl KeyValueStore for MemorySyncedStore {
    fn get(&self, id: &str) -> Option<Primitive> {
        lock_recovering(&self.state).get(id)
    }

    fn set(&self, id: &str, value: Primitive) {
        lock_recovering(&self.state).set(id, value);
        // Synthesized internal-change broadcast: the store itself only
        // notifies for external changes.
        self.hub
            .post(ChangeOrigin::Internal, &KeyChangeNotice::single(id));
    }

    fn remove(&self, id: &str) {
        let removed = lock_recovering(&self.state).remove(id);
        if removed {
            self.hub
                .post(ChangeOrigin::Internal, &KeyChangeNotice::single(id));
        }
    }

    fn snapshot(&self) -> BTreeMap<String, Primitive> {
        lock_recovering(&self.state).snapshot()
    }

    fn register_default(&self, id: &str, value: Primitive) {
        lock_recovering(&self.state).register(id, value);
    }
}

impl SyncedStore for MemorySyncedStore {
    fn subscribe(&self, origin: ChangeOrigin, observer: NoticeObserver) -> SubscriptionId {
        self.hub.subscribe(origin, observer)
    }

    fn unsubscribe(&self, origin: ChangeOrigin, id: SubscriptionId) {
        self.hub.unsubscribe(origin, id)
    }
}
