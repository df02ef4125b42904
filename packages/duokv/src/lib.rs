//! duokv: typed keys over a local and a synchronized key-value store.
//!
//! Application code defines a [`Key`] once - identifier, default value,
//! representation - and uses it to read and write strongly-typed values
//! against either backing store, never touching raw primitives. The layers
//! re-exported here:
//!
//! - `substrate`: primitive wire values and the store surfaces
//! - `repr`: composable representations (primitive, proxy, optional,
//!   collections)
//! - `typed`: keys, defaults registration, ready-made serde proxies
//! - `memstore`: in-memory and disk-backed reference stores
//! - `observe`: one change signal over both stores' notification models
//!
//! ```rust
//! use duokv::{Key, MemoryLocalStore, PrimitiveRepr, ReprExt};
//!
//! let favorites: Key<Option<Vec<String>>> = Key::new(
//!     "favorites",
//!     None,
//!     PrimitiveRepr::<String>::new().as_array().optional(),
//! );
//!
//! let store = MemoryLocalStore::new();
//! favorites.set(&store, &Some(vec!["a".to_string()]));
//! assert_eq!(favorites.get(&store), Some(vec!["a".to_string()]));
//! ```

pub use duokv_memstore::{DiskLocalStore, DiskStoreError, MemoryLocalStore, MemorySyncedStore};
pub use duokv_observe::{watch_local, watch_synced, Executor, InlineExecutor, KeyWatch};
pub use duokv_repr::{
    ArrayRepr, MapRepr, NativePrimitive, OptionalRepr, PrimitiveRepr, ProxyRepr, Representation,
    ReprExt,
};
pub use duokv_substrate::{
    BroadcastHub, ChangeOrigin, KeyChangeNotice, KeyObserver, KeyValueStore, Kind, LocalStore,
    NoticeObserver, ObservationToken, Primitive, SubscriptionId, SyncedStore, TypeMismatch,
};
pub use duokv_typed::{
    absolute_path, json, register_defaults, system_time, uuid, DebugKey, Key, RegistrableKey,
    RegistrationOptions,
};
