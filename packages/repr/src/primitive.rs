//! Identity representations for natively-storable types.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::PathBuf;

use duokv_substrate::{KeyValueStore, Primitive};

use crate::Representation;

/// Types the substrate stores hold natively.
///
/// Extraction uses the existence-checking accessors of [`Primitive`]: an
/// absent or wrong-shaped entry is `None`, never a falsy or zero default.
/// That distinction is what lets typed keys fall back to their own default
/// exactly when nothing usable is stored.
pub trait NativePrimitive: Clone + Send + Sync {
    /// Extract a value of this type from a stored primitive.
    fn from_primitive(primitive: &Primitive) -> Option<Self>;

    /// Wrap this value in its wire shape.
    fn to_primitive(&self) -> Primitive;
}

impl NativePrimitive for bool {
    fn from_primitive(primitive: &Primitive) -> Option<Self> {
        primitive.as_bool()
    }

    fn to_primitive(&self) -> Primitive {
        Primitive::Bool(*self)
    }
}

impl NativePrimitive for i64 {
    fn from_primitive(primitive: &Primitive) -> Option<Self> {
        primitive.as_integer()
    }

    fn to_primitive(&self) -> Primitive {
        Primitive::Integer(*self)
    }
}

impl NativePrimitive for f64 {
    fn from_primitive(primitive: &Primitive) -> Option<Self> {
        primitive.as_float()
    }

    fn to_primitive(&self) -> Primitive {
        Primitive::Float(*self)
    }
}

impl NativePrimitive for String {
    fn from_primitive(primitive: &Primitive) -> Option<Self> {
        primitive.as_text().map(str::to_owned)
    }

    fn to_primitive(&self) -> Primitive {
        Primitive::Text(self.clone())
    }
}

impl NativePrimitive for Vec<u8> {
    fn from_primitive(primitive: &Primitive) -> Option<Self> {
        primitive.as_blob().map(<[u8]>::to_vec)
    }

    fn to_primitive(&self) -> Primitive {
        Primitive::Blob(self.clone())
    }
}

impl NativePrimitive for PathBuf {
    fn from_primitive(primitive: &Primitive) -> Option<Self> {
        primitive.as_path().map(std::path::Path::to_path_buf)
    }

    fn to_primitive(&self) -> Primitive {
        Primitive::PathRef(self.clone())
    }
}

/// The identity representation: `Value` is stored as itself.
///
/// This is the terminal stage of every representation chain; proxy chains
/// must bottom out here.
///
/// # Example
///
/// ```rust
/// use duokv_repr::PrimitiveRepr;
///
/// let ints = PrimitiveRepr::<i64>::new();
/// let text = PrimitiveRepr::<String>::new();
/// # let _ = (ints, text);
/// ```
pub struct PrimitiveRepr<V> {
    _value: PhantomData<fn() -> V>,
}

impl<V> PrimitiveRepr<V> {
    /// Create the identity representation for `V`.
    pub fn new() -> Self {
        PrimitiveRepr {
            _value: PhantomData,
        }
    }
}

impl<V> Default for PrimitiveRepr<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for PrimitiveRepr<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for PrimitiveRepr<V> {}

impl<V> std::fmt::Debug for PrimitiveRepr<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrimitiveRepr")
    }
}

impl<V: NativePrimitive> Representation for PrimitiveRepr<V> {
    type Value = V;

    fn get_from_array(&self, index: usize, array: &[Primitive]) -> Option<V> {
        array.get(index).and_then(V::from_primitive)
    }

    fn append_to_array(&self, value: &V, array: &mut Vec<Primitive>) {
        array.push(value.to_primitive());
    }

    fn get_from_map(&self, key: &str, map: &BTreeMap<String, Primitive>) -> Option<V> {
        map.get(key).and_then(V::from_primitive)
    }

    fn set_in_map(&self, key: &str, value: &V, map: &mut BTreeMap<String, Primitive>) {
        map.insert(key.to_string(), value.to_primitive());
    }

    fn get_from_store(&self, id: &str, store: &dyn KeyValueStore) -> Option<V> {
        store.get(id).and_then(|p| V::from_primitive(&p))
    }

    fn set_in_store(&self, id: &str, value: &V, store: &dyn KeyValueStore) {
        store.set(id, value.to_primitive());
    }
}
