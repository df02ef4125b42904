//! The Primitive type - the wire values both stores accept.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// A value in the shape the backing stores natively hold.
///
/// Both the local store and the synchronized store are untyped, string-keyed
/// maps from identifier to `Primitive`. Everything richer (timestamps,
/// identifiers, domain structs) is encoded down to one of these shapes by a
/// representation before it reaches a store.
///
/// # Design Notes
///
/// - Uses `BTreeMap` for deterministic ordering (important for snapshots and
///   comparison in tests)
/// - There is no null variant: absence is expressed by the key not being
///   present in the store, never by a stored placeholder
/// - `PathRef` carries an absolute filesystem reference; validation of
///   absoluteness is a representation concern, not enforced here
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Binary data.
    Blob(Vec<u8>),
    /// Absolute-path reference.
    PathRef(PathBuf),
    /// Ordered sequence of primitives.
    Array(Vec<Primitive>),
    /// String-keyed map of primitives.
    Map(BTreeMap<String, Primitive>),
}

/// The variant of a `Primitive`, used in mismatch reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Bool,
    Integer,
    Float,
    Text,
    Blob,
    PathRef,
    Array,
    Map,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Kind::Bool => "bool",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Text => "text",
            Kind::Blob => "blob",
            Kind::PathRef => "path",
            Kind::Array => "array",
            Kind::Map => "map",
        };
        write!(f, "{}", name)
    }
}

/// A stored primitive had a different shape than the one requested.
#[derive(Debug, thiserror::Error)]
#[error("type mismatch: expected {expected}, found {found}")]
pub struct TypeMismatch {
    /// The shape the caller asked for.
    pub expected: Kind,
    /// The shape actually stored.
    pub found: Kind,
}

impl Primitive {
    /// The variant of this primitive.
    pub fn kind(&self) -> Kind {
        match self {
            Primitive::Bool(_) => Kind::Bool,
            Primitive::Integer(_) => Kind::Integer,
            Primitive::Float(_) => Kind::Float,
            Primitive::Text(_) => Kind::Text,
            Primitive::Blob(_) => Kind::Blob,
            Primitive::PathRef(_) => Kind::PathRef,
            Primitive::Array(_) => Kind::Array,
            Primitive::Map(_) => Kind::Map,
        }
    }

    /// Get the boolean value, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Primitive::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the integer value, if this is an `Integer`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Primitive::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the float value, if this is a `Float`.
    ///
    /// An `Integer` is also accepted and widened: serialization formats used
    /// by disk-backed stores do not preserve the integer/float distinction
    /// for whole numbers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Primitive::Float(f) => Some(*f),
            Primitive::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get the text, if this is `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Primitive::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the binary data, if this is a `Blob`.
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Primitive::Blob(b) => Some(b),
            _ => None,
        }
    }

    /// Get the path reference, if this is a `PathRef`.
    pub fn as_path(&self) -> Option<&std::path::Path> {
        match self {
            Primitive::PathRef(p) => Some(p),
            _ => None,
        }
    }

    /// Get the element slice, if this is an `Array`.
    pub fn as_array(&self) -> Option<&[Primitive]> {
        match self {
            Primitive::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get the entry map, if this is a `Map`.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Primitive>> {
        match self {
            Primitive::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

// Conversion from native types

impl From<bool> for Primitive {
    fn from(v: bool) -> Self {
        Primitive::Bool(v)
    }
}

impl From<i64> for Primitive {
    fn from(v: i64) -> Self {
        Primitive::Integer(v)
    }
}

impl From<i32> for Primitive {
    fn from(v: i32) -> Self {
        Primitive::Integer(v as i64)
    }
}

impl From<f64> for Primitive {
    fn from(v: f64) -> Self {
        Primitive::Float(v)
    }
}

impl From<String> for Primitive {
    fn from(v: String) -> Self {
        Primitive::Text(v)
    }
}

impl From<&str> for Primitive {
    fn from(v: &str) -> Self {
        Primitive::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Primitive {
    fn from(v: Vec<u8>) -> Self {
        Primitive::Blob(v)
    }
}

impl From<PathBuf> for Primitive {
    fn from(v: PathBuf) -> Self {
        Primitive::PathRef(v)
    }
}

impl From<BTreeMap<String, Primitive>> for Primitive {
    fn from(v: BTreeMap<String, Primitive>) -> Self {
        Primitive::Map(v)
    }
}

impl<T: Into<Primitive>> From<Vec<T>> for Primitive {
    fn from(v: Vec<T>) -> Self {
        Primitive::Array(v.into_iter().map(Into::into).collect())
    }
}

// Fallible extraction back to native types

macro_rules! try_from_primitive {
    ($native:ty, $accessor:ident, $expected:expr, $to_owned:expr) => {
        impl TryFrom<Primitive> for $native {
            type Error = TypeMismatch;

            fn try_from(p: Primitive) -> Result<Self, Self::Error> {
                let found = p.kind();
                p.$accessor().map($to_owned).ok_or(TypeMismatch {
                    expected: $expected,
                    found,
                })
            }
        }
    };
}

try_from_primitive!(bool, as_bool, Kind::Bool, |b| b);
try_from_primitive!(i64, as_integer, Kind::Integer, |i| i);
try_from_primitive!(f64, as_float, Kind::Float, |f| f);
try_from_primitive!(String, as_text, Kind::Text, str::to_owned);
try_from_primitive!(Vec<u8>, as_blob, Kind::Blob, <[u8]>::to_vec);
try_from_primitive!(PathBuf, as_path, Kind::PathRef, |p: &std::path::Path| p
    .to_path_buf());
