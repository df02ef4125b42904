//! Broadcast notification plumbing for the synchronized store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::{NoticeObserver, SubscriptionId};

/// The two broadcast notification names a synchronized store posts under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeOrigin {
    /// The change arrived from outside the process (e.g. another device).
    External,
    /// The change was an in-process write; the notice is synthesized by the
    /// store immediately after the write succeeds.
    Internal,
}

/// The payload of a changed-keys broadcast: which identifiers may have new
/// values.
///
/// Carries no values and implies no ordering; subscribers re-read the store.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyChangeNotice {
    /// Identifiers of the keys that changed.
    pub key_ids: Vec<String>,
}

impl KeyChangeNotice {
    /// A notice for a batch of changed keys.
    pub fn new(key_ids: Vec<String>) -> Self {
        KeyChangeNotice { key_ids }
    }

    /// A notice for a single changed key.
    pub fn single(key_id: impl Into<String>) -> Self {
        KeyChangeNotice {
            key_ids: vec![key_id.into()],
        }
    }

    /// Whether a key identifier is part of this notice.
    pub fn contains(&self, key_id: &str) -> bool {
        self.key_ids.iter().any(|id| id == key_id)
    }
}

/// Subscription registry for changed-keys broadcasts.
///
/// Synchronized-store implementations embed one of these and post a notice
/// under `ChangeOrigin::Internal` after every successful in-process write,
/// and under `ChangeOrigin::External` when changes arrive from outside.
///
/// Observers are invoked on the posting thread with the registry lock
/// released, so an observer may re-read the store or adjust subscriptions.
#[derive(Default)]
pub struct BroadcastHub {
    next_id: AtomicU64,
    subscribers: Mutex<HashMap<ChangeOrigin, Vec<(SubscriptionId, NoticeObserver)>>>,
}

impl BroadcastHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer under a notification name.
    pub fn subscribe(&self, origin: ChangeOrigin, observer: NoticeObserver) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock_recovering(&self.subscribers)
            .entry(origin)
            .or_default()
            .push((id, observer));
        id
    }

    /// Remove a subscription. Unknown ids are a defensive no-op.
    pub fn unsubscribe(&self, origin: ChangeOrigin, id: SubscriptionId) {
        if let Some(list) = lock_recovering(&self.subscribers).get_mut(&origin) {
            list.retain(|(sub_id, _)| *sub_id != id);
        }
    }

    /// Deliver a notice to every subscriber of a notification name.
    pub fn post(&self, origin: ChangeOrigin, notice: &KeyChangeNotice) {
        let observers: Vec<NoticeObserver> = lock_recovering(&self.subscribers)
            .get(&origin)
            .map(|list| list.iter().map(|(_, o)| o.clone()).collect())
            .unwrap_or_default();

        for observer in observers {
            observer(notice);
        }
    }

    /// Number of live subscriptions under a notification name.
    pub fn subscriber_count(&self, origin: ChangeOrigin) -> usize {
        lock_recovering(&self.subscribers)
            .get(&origin)
            .map_or(0, Vec::len)
    }
}

/// Lock a mutex, recovering the guard if a panicking observer poisoned it.
fn lock_recovering<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
