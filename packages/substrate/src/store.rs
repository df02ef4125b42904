//! Store surfaces: the shared primitive interface and the two observation
//! mechanisms.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{ChangeOrigin, KeyChangeNotice, Primitive};

/// A synchronous callback fired when an observed key mutates in a local
/// store.
pub type KeyObserver = Arc<dyn Fn() + Send + Sync>;

/// A callback fired with the changed-keys payload of a synchronized store
/// broadcast.
pub type NoticeObserver = Arc<dyn Fn(&KeyChangeNotice) + Send + Sync>;

/// Opaque per-registration context for local-store key observation.
///
/// Disambiguates multiple observers of the same key and locates the matching
/// deregistration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObservationToken(u64);

impl ObservationToken {
    /// Create a token from a store-assigned value.
    pub fn new(raw: u64) -> Self {
        ObservationToken(raw)
    }
}

/// Opaque handle for a synchronized-store broadcast subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Create an id from a store-assigned value.
    pub fn new(raw: u64) -> Self {
        SubscriptionId(raw)
    }
}

/// The primitive surface shared by both store kinds.
///
/// Implementations are process-wide shared resources and must be safe for
/// concurrent access; this layer adds no locking of its own.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `&dyn KeyValueStore` or
/// `Arc<dyn KeyValueStore>`. Typed keys address either store kind through
/// this trait.
pub trait KeyValueStore: Send + Sync {
    /// Get the primitive stored under an identifier.
    ///
    /// Returns `None` when nothing is stored. This is the
    /// existence-checking accessor: an absent key is distinguishable from a
    /// stored falsy or zero value, and absence never yields a default.
    fn get(&self, id: &str) -> Option<Primitive>;

    /// Store a primitive under an identifier, replacing any previous value.
    fn set(&self, id: &str, value: Primitive);

    /// Remove the identifier's entry, if any.
    fn remove(&self, id: &str);

    /// A point-in-time view of every resolvable entry.
    ///
    /// Explicitly-set values shadow registered defaults.
    fn snapshot(&self) -> BTreeMap<String, Primitive>;

    /// Write a soft default into the registration domain.
    ///
    /// Registered defaults are consulted by `get` only when no explicit
    /// value is stored; registering never overwrites an explicit value.
    fn register_default(&self, id: &str, value: Primitive);
}

/// The local store: synchronous, process-local, observable per key.
pub trait LocalStore: KeyValueStore {
    /// Begin receiving synchronous callbacks on every mutation of `id`.
    ///
    /// The returned token must be passed back to [`unobserve_key`] exactly
    /// once on teardown; a leaked registration is a resource leak.
    ///
    /// [`unobserve_key`]: LocalStore::unobserve_key
    fn observe_key(&self, id: &str, observer: KeyObserver) -> ObservationToken;

    /// Remove a key observation.
    ///
    /// Safe to call with an already-removed token (defensive no-op).
    fn unobserve_key(&self, id: &str, token: ObservationToken);
}

/// The synchronized store: eventually consistent, observable only via
/// broadcast.
///
/// The store itself only broadcasts `ChangeOrigin::External` notices for
/// changes arriving from outside the process. A conforming implementation
/// synthesizes a `ChangeOrigin::Internal` notice immediately after every
/// successful in-process write, carrying the same payload shape, so that
/// subscribers cannot distinguish origin.
pub trait SyncedStore: KeyValueStore {
    /// Subscribe to one of the two broadcast notification names.
    fn subscribe(&self, origin: ChangeOrigin, observer: NoticeObserver) -> SubscriptionId;

    /// Remove a broadcast subscription.
    ///
    /// Safe to call with an already-removed id (defensive no-op).
    fn unsubscribe(&self, origin: ChangeOrigin, id: SubscriptionId);
}

// Blanket implementations for references and smart pointers

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, id: &str) -> Option<Primitive> {
        (**self).get(id)
    }

    fn set(&self, id: &str, value: Primitive) {
        (**self).set(id, value)
    }

    fn remove(&self, id: &str) {
        (**self).remove(id)
    }

    fn snapshot(&self) -> BTreeMap<String, Primitive> {
        (**self).snapshot()
    }

    fn register_default(&self, id: &str, value: Primitive) {
        (**self).register_default(id, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, id: &str) -> Option<Primitive> {
        (**self).get(id)
    }

    fn set(&self, id: &str, value: Primitive) {
        (**self).set(id, value)
    }

    fn remove(&self, id: &str) {
        (**self).remove(id)
    }

    fn snapshot(&self) -> BTreeMap<String, Primitive> {
        (**self).snapshot()
    }

    fn register_default(&self, id: &str, value: Primitive) {
        (**self).register_default(id, value)
    }
}

impl<T: LocalStore + ?Sized> LocalStore for Arc<T> {
    fn observe_key(&self, id: &str, observer: KeyObserver) -> ObservationToken {
        (**self).observe_key(id, observer)
    }

    fn unobserve_key(&self, id: &str, token: ObservationToken) {
        (**self).unobserve_key(id, token)
    }
}

impl<T: SyncedStore + ?Sized> SyncedStore for Arc<T> {
    fn subscribe(&self, origin: ChangeOrigin, observer: NoticeObserver) -> SubscriptionId {
        (**self).subscribe(origin, observer)
    }

    fn unsubscribe(&self, origin: ChangeOrigin, id: SubscriptionId) {
        (**self).unsubscribe(origin, id)
    }
}
