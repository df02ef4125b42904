//! Ready-made proxy representations for common domain types.
//!
//! Each of these is an ordinary [`ProxyRepr`] chain bottoming out at a
//! primitive, so they compose with `.optional()` / `.as_array()` /
//! `.as_map()` like any other representation.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use duokv_repr::{PrimitiveRepr, ProxyRepr, ReprExt};

/// A structured type persisted via its JSON serialization, stored as one
/// canonical text blob per key.
///
/// Encode failure (a value serde cannot serialize) drops the write; decode
/// failure (a corrupt or shape-mismatched blob) yields nothing, which a
/// [`Key`](crate::Key) turns into its default.
///
/// # Example
///
/// ```rust
/// use duokv_typed::{json, Key};
/// use duokv_memstore::MemoryLocalStore;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// struct WindowLayout {
///     width: u32,
///     height: u32,
/// }
///
/// let layout = Key::new(
///     "windowLayout",
///     WindowLayout { width: 800, height: 600 },
///     json(),
/// );
/// let store = MemoryLocalStore::new();
/// layout.set(&store, &WindowLayout { width: 1024, height: 768 });
/// assert_eq!(layout.get(&store).width, 1024);
/// ```
pub fn json<T>() -> ProxyRepr<PrimitiveRepr<String>, T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    PrimitiveRepr::<String>::new().proxied(
        |value: &T| serde_json::to_string(value).ok(),
        |text| serde_json::from_str(&text).ok(),
    )
}

/// A timestamp persisted as a float offset in seconds since the Unix
/// epoch.
///
/// Pre-epoch times have no encoding (the write is dropped); negative,
/// non-finite, or out-of-range stored offsets decode to nothing.
pub fn system_time() -> ProxyRepr<PrimitiveRepr<f64>, SystemTime> {
    PrimitiveRepr::<f64>::new().proxied(
        |time: &SystemTime| {
            time.duration_since(UNIX_EPOCH)
                .ok()
                .map(|offset| offset.as_secs_f64())
        },
        |seconds| {
            Duration::try_from_secs_f64(seconds)
                .ok()
                .and_then(|offset| UNIX_EPOCH.checked_add(offset))
        },
    )
}

/// An identifier persisted through its canonical text form.
pub fn uuid() -> ProxyRepr<PrimitiveRepr<String>, Uuid> {
    PrimitiveRepr::<String>::new().proxied(
        |id: &Uuid| Some(id.to_string()),
        |text| Uuid::parse_str(&text).ok(),
    )
}

/// A path reference restricted to absolute paths.
///
/// Relative paths have no encoding and decode to nothing; the substrate
/// `PathRef` shape itself does not enforce absoluteness.
pub fn absolute_path() -> ProxyRepr<PrimitiveRepr<PathBuf>, PathBuf> {
    PrimitiveRepr::<PathBuf>::new().proxied(
        |path: &PathBuf| path.is_absolute().then(|| path.clone()),
        |path| path.is_absolute().then_some(path),
    )
}
