//! duokv typed access: the Key abstraction and ready-made representations.
//!
//! A [`Key`] binds a stable identifier, a default value, and a resolved
//! representation into the typed handle application code uses against
//! either store:
//!
//! ```rust
//! use duokv_typed::Key;
//! use duokv_repr::PrimitiveRepr;
//! use duokv_memstore::MemoryLocalStore;
//!
//! let retry_count = Key::new("retryCount", 0i64, PrimitiveRepr::new());
//! let store = MemoryLocalStore::new();
//!
//! assert_eq!(retry_count.get(&store), 0);
//! retry_count.set(&store, &5);
//! assert_eq!(retry_count.get(&store), 5);
//! retry_count.remove(&store);
//! assert_eq!(retry_count.get(&store), 0);
//! ```
//!
//! Also here: [`DebugKey`] (mutable only in debug builds), bulk
//! [`register_defaults`], and ready-made proxies for structured types
//! (serde/JSON through one text blob per key), timestamps, identifiers, and
//! absolute paths.

mod debug_key;
mod key;
mod proxies;
mod registration;

pub use debug_key::DebugKey;
pub use key::Key;
pub use proxies::{absolute_path, json, system_time, uuid};
pub use registration::{register_defaults, RegistrableKey, RegistrationOptions};
