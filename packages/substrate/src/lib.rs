//! duokv substrate: the raw layer both stores speak.
//!
//! This layer defines what the backing stores can actually hold and how they
//! are addressed:
//! - `Primitive`: the restricted set of wire values (bool, integer, float,
//!   text, blob, path reference, homogeneous array/map)
//! - `KeyValueStore`: the primitive get/set/remove/snapshot surface shared
//!   by both store kinds
//! - `LocalStore` / `SyncedStore`: the two observation mechanisms
//! - `BroadcastHub`: subscription plumbing for the synchronized store's
//!   changed-keys notifications
//!
//! Nothing here is typed: typed access lives in the `duokv-repr` and
//! `duokv-typed` layers above.

mod notify;
mod primitive;
mod store;

pub use notify::{BroadcastHub, ChangeOrigin, KeyChangeNotice};
pub use primitive::{Kind, Primitive, TypeMismatch};
pub use store::{
    KeyObserver, KeyValueStore, LocalStore, NoticeObserver, ObservationToken, SubscriptionId,
    SyncedStore,
};
