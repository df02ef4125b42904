//! Key watches: registration handles over either store's mechanism.

use std::sync::{Arc, Mutex};

use duokv_substrate::{
    ChangeOrigin, KeyChangeNotice, LocalStore, NoticeObserver, ObservationToken, SubscriptionId,
    SyncedStore,
};

use crate::Executor;

/// What a live watch holds so it can be torn down.
enum Registration {
    Local {
        store: Arc<dyn LocalStore>,
        key_id: String,
        token: ObservationToken,
    },
    Synced {
        store: Arc<dyn SyncedStore>,
        external: SubscriptionId,
        internal: SubscriptionId,
    },
}

enum WatchState {
    Active(Registration),
    Cancelled,
}

/// A live change-signal registration for one key against one store.
///
/// Obtained from [`watch_local`] or [`watch_synced`]. Cancellation removes
/// every underlying registration (the local observation token, or both
/// broadcast subscriptions); [`cancel`](KeyWatch::cancel) is idempotent,
/// and dropping the handle cancels, so a registration can only leak if the
/// handle itself is leaked.
pub struct KeyWatch {
    state: Mutex<WatchState>,
}

impl KeyWatch {
    /// Tear down the registration. Safe to call more than once.
    pub fn cancel(&self) {
        let mut state = lock_recovering(&self.state);
        match std::mem::replace(&mut *state, WatchState::Cancelled) {
            WatchState::Active(Registration::Local {
                store,
                key_id,
                token,
            }) => store.unobserve_key(&key_id, token),
            WatchState::Active(Registration::Synced {
                store,
                external,
                internal,
            }) => {
                store.unsubscribe(ChangeOrigin::External, external);
                store.unsubscribe(ChangeOrigin::Internal, internal);
            }
            WatchState::Cancelled => log::debug!("watch already cancelled; ignoring"),
        }
    }

    /// Whether the registration is still live.
    pub fn is_active(&self) -> bool {
        matches!(*lock_recovering(&self.state), WatchState::Active(_))
    }

    fn active(registration: Registration) -> Self {
        KeyWatch {
            state: Mutex::new(WatchState::Active(registration)),
        }
    }
}

impl Drop for KeyWatch {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Watch a key in a local store.
///
/// The store's synchronous per-key callback is redispatched through
/// `executor` before `on_change` runs, so the subscriber sees the signal
/// on its own context even though the store calls back on the mutating
/// thread.
pub fn watch_local(
    store: Arc<dyn LocalStore>,
    key_id: impl Into<String>,
    executor: Arc<dyn Executor>,
    on_change: impl Fn() + Send + Sync + 'static,
) -> KeyWatch {
    let key_id = key_id.into();
    let signal: Arc<dyn Fn() + Send + Sync> = Arc::new(on_change);

    let observer = {
        let signal = signal.clone();
        let executor = executor.clone();
        Arc::new(move || {
            let signal = signal.clone();
            executor.execute(Box::new(move || signal()));
        })
    };

    let token = store.observe_key(&key_id, observer);
    KeyWatch::active(Registration::Local {
        store,
        key_id,
        token,
    })
}

/// Watch a key in a synchronized store.
///
/// Subscribes to both broadcast notification names - the genuine
/// external-change one and the synthesized internal-change one - filters
/// each notice by the watched key's identifier, and redispatches matching
/// ones through `executor`. The subscriber cannot tell which origin a
/// signal came from.
///
/// The signal means only "this key's value may have changed; re-read it".
/// It is best-effort with respect to in-process writes: read-after-write
/// consistency comes from reading the store, not from the signal.
pub fn watch_synced(
    store: Arc<dyn SyncedStore>,
    key_id: impl Into<String>,
    executor: Arc<dyn Executor>,
    on_change: impl Fn() + Send + Sync + 'static,
) -> KeyWatch {
    let key_id = key_id.into();
    let signal: Arc<dyn Fn() + Send + Sync> = Arc::new(on_change);

    let make_observer = || -> NoticeObserver {
        let key_id = key_id.clone();
        let signal = signal.clone();
        let executor = executor.clone();
        Arc::new(move |notice: &KeyChangeNotice| {
            if notice.contains(&key_id) {
                let signal = signal.clone();
                executor.execute(Box::new(move || signal()));
            }
        })
    };

    let external = store.subscribe(ChangeOrigin::External, make_observer());
    let internal = store.subscribe(ChangeOrigin::Internal, make_observer());

    KeyWatch::active(Registration::Synced {
        store,
        external,
        internal,
    })
}

fn lock_recovering<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
