//! duokv observation bridge: one "value may have changed" signal over two
//! very different notification models.
//!
//! The local store notifies synchronously per key; the synchronized store
//! only broadcasts changed-key sets (externally-originated ones itself,
//! internally-originated ones synthesized by the store after each write).
//! [`watch_local`] and [`watch_synced`] hide that difference behind a
//! single signal: the subscriber learns that a key *may* have a new value
//! and re-reads it. No value diffing is performed.
//!
//! Delivery is redispatched through an [`Executor`] so the signal arrives
//! on whatever logical execution context the subscriber expects (a UI
//! context, typically). Registration is torn down through the returned
//! [`KeyWatch`] handle; dropping the handle cancels too.

mod executor;
mod watch;

pub use executor::{Executor, InlineExecutor};
pub use watch::{watch_local, watch_synced, KeyWatch};
