//! Reference store implementations for duokv.
//!
//! Production deployments bind the substrate traits to whatever host
//! facilities actually back them; these implementations exist so the typed
//! and observation layers have something real to run against, in tests and
//! in small tools:
//!
//! - [`MemoryLocalStore`]: in-memory local store with synchronous per-key
//!   observation
//! - [`MemorySyncedStore`]: in-memory synchronized store that synthesizes
//!   internal-change broadcasts and can ingest external changes
//! - [`DiskLocalStore`]: a local store persisted write-through to one JSON
//!   file

mod convert;
mod disk;
mod local;
mod state;
mod synced;

pub use disk::{DiskLocalStore, DiskStoreError};
pub use local::MemoryLocalStore;
pub use synced::MemorySyncedStore;
