//! A local store persisted write-through to a single JSON file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{fs, io};

use duokv_substrate::{KeyObserver, KeyValueStore, LocalStore, ObservationToken, Primitive};

use crate::convert::{json_to_primitive, primitive_to_json};
use crate::MemoryLocalStore;

/// Errors opening a disk-backed store.
#[derive(Debug, thiserror::Error)]
pub enum DiskStoreError {
    /// The store file could not be read.
    #[error("i/o error reading store file: {0}")]
    Io(#[from] io::Error),

    /// The store file exists but does not parse as a store snapshot.
    #[error("corrupt store file {path}: {message}")]
    Corrupt {
        /// The offending file.
        path: PathBuf,
        /// Parser detail.
        message: String,
    },
}

/// A [`LocalStore`] persisted write-through to one JSON file.
///
/// Every mutation rewrites the file with the current explicit values;
/// registered defaults are an in-memory overlay and are never persisted.
/// A persistence failure is logged and the in-memory state keeps the
/// write - the primitive store surface has no error channel, and losing
/// the write entirely would be worse than losing durability.
///
/// Observation behaves exactly as [`MemoryLocalStore`]'s.
pub struct DiskLocalStore {
    file_path: PathBuf,
    inner: MemoryLocalStore,
}

impl DiskLocalStore {
    /// Open a store backed by `file_path`, loading any existing snapshot.
    ///
    /// A missing file is an empty store; an unreadable or unparsable file
    /// is an error.
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self, DiskStoreError> {
        let file_path = file_path.into();
        let inner = MemoryLocalStore::new();

        match fs::read_to_string(&file_path) {
            Ok(contents) => {
                let values = parse_snapshot(&file_path, &contents)?;
                inner.replace_explicit_values(values);
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => return Err(error.into()),
        }

        Ok(DiskLocalStore { file_path, inner })
    }

    /// The file this store persists to.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn persist(&self) {
        let values = self.inner.explicit_values();
        let json: serde_json::Map<String, serde_json::Value> = values
            .iter()
            .map(|(k, v)| (k.clone(), primitive_to_json(v)))
            .collect();

        let serialized = match serde_json::to_string_pretty(&json) {
            Ok(s) => s,
            Err(error) => {
                log::warn!("store snapshot serialization failed: {error}");
                return;
            }
        };

        log::debug!("writing {}...", self.file_path.display());
        if let Err(error) = fs::write(&self.file_path, serialized) {
            log::warn!(
                "persisting store to {} failed: {error}",
                self.file_path.display()
            );
        }
    }
}

fn parse_snapshot(
    path: &Path,
    contents: &str,
) -> Result<BTreeMap<String, Primitive>, DiskStoreError> {
    let json: serde_json::Value =
        serde_json::from_str(contents).map_err(|error| DiskStoreError::Corrupt {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;

    let entries = json.as_object().ok_or_else(|| DiskStoreError::Corrupt {
        path: path.to_path_buf(),
        message: "top level is not an object".to_string(),
    })?;

    entries
        .iter()
        .map(|(id, value)| {
            json_to_primitive(value)
                .map(|p| (id.clone(), p))
                .ok_or_else(|| DiskStoreError::Corrupt {
                    path: path.to_path_buf(),
                    message: format!("entry {id:?} has no storable shape"),
                })
        })
        .collect()
}

impl KeyValueStore for DiskLocalStore {
    fn get(&self, id: &str) -> Option<Primitive> {
        self.inner.get(id)
    }

    fn set(&self, id: &str, value: Primitive) {
        self.inner.set(id, value);
        self.persist();
    }

    fn remove(&self, id: &str) {
        self.inner.remove(id);
        self.persist();
    }

    fn snapshot(&self) -> BTreeMap<String, Primitive> {
        self.inner.snapshot()
    }

    fn register_default(&self, id: &str, value: Primitive) {
        self.inner.register_default(id, value);
    }
}

impl LocalStore for DiskLocalStore {
    fn observe_key(&self, id: &str, observer: KeyObserver) -> ObservationToken {
        self.inner.observe_key(id, observer)
    }

    fn unobserve_key(&self, id: &str, token: ObservationToken) {
        self.inner.unobserve_key(id, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("prefs.json");

        {
            let store = DiskLocalStore::open(&file).unwrap();
            store.set("count", Primitive::Integer(5));
            store.set("name", Primitive::Text("alice".into()));
            store.set("data", Primitive::Blob(vec![1, 2, 3]));
        }

        let reopened = DiskLocalStore::open(&file).unwrap();
        assert_eq!(reopened.get("count"), Some(Primitive::Integer(5)));
        assert_eq!(reopened.get("name"), Some(Primitive::Text("alice".into())));
        assert_eq!(reopened.get("data"), Some(Primitive::Blob(vec![1, 2, 3])));
    }

    #[test]
    fn remove_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("prefs.json");

        {
            let store = DiskLocalStore::open(&file).unwrap();
            store.set("gone", Primitive::Bool(true));
            store.remove("gone");
        }

        let reopened = DiskLocalStore::open(&file).unwrap();
        assert_eq!(reopened.get("gone"), None);
    }

    #[test]
    fn non_finite_float_survives_reopen_without_corrupting_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("prefs.json");

        {
            let store = DiskLocalStore::open(&file).unwrap();
            store.set("bad", Primitive::Float(f64::NAN));
            store.set("good", Primitive::Integer(1));
        }

        let reopened = DiskLocalStore::open(&file).unwrap();
        assert_eq!(reopened.get("good"), Some(Primitive::Integer(1)));
        match reopened.get("bad") {
            Some(Primitive::Float(f)) => assert!(f.is_nan()),
            other => panic!("expected a float, got {other:?}"),
        }
    }

    #[test]
    fn registered_defaults_are_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("prefs.json");

        {
            let store = DiskLocalStore::open(&file).unwrap();
            store.register_default("theme", Primitive::from("light"));
            store.set("other", Primitive::Integer(1));
        }

        let reopened = DiskLocalStore::open(&file).unwrap();
        assert_eq!(reopened.get("theme"), None);
    }

    #[test]
    fn missing_file_is_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskLocalStore::open(dir.path().join("absent.json")).unwrap();
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("prefs.json");
        fs::write(&file, "{not json").unwrap();

        match DiskLocalStore::open(&file) {
            Err(DiskStoreError::Corrupt { .. }) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("expected corrupt-file error"),
        }
    }

    #[test]
    fn observation_delegates_to_memory_behavior() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let store = DiskLocalStore::open(dir.path().join("prefs.json")).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = hits.clone();
        let token = store.observe_key(
            "k",
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        store.set("k", Primitive::Integer(1));
        store.unobserve_key("k", token);
        store.set("k", Primitive::Integer(2));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
