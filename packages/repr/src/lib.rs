//! duokv representations: composable mappings between domain types and
//! substrate primitives.
//!
//! A [`Representation`] knows how to read and write one `Value` type against
//! every substrate shape: an element of an array, an entry of a string-keyed
//! map, and a slot in either store. Representations compose:
//!
//! - [`PrimitiveRepr`]: identity mapping for natively-storable types
//! - [`ProxyRepr`]: a domain type encoded through another persistible type
//! - [`OptionalRepr`]: absence in storage identified with `None`
//! - [`ArrayRepr`] / [`MapRepr`]: homogeneous collections, recursing
//!   structurally for nested shapes
//!
//! Combinators on [`ReprExt`] chain these without naming the wrapper types:
//!
//! ```rust
//! use duokv_repr::{PrimitiveRepr, ReprExt};
//!
//! // Codec for Option<Vec<String>>
//! let repr = PrimitiveRepr::<String>::new().as_array().optional();
//! # let _ = repr;
//! ```
//!
//! Failure is never an error value at this layer: a failed decode is
//! `None`, a failed encode is a dropped write.

mod collection;
mod optional;
mod primitive;
mod proxy;
#[cfg(test)]
mod testutil;
mod traits;

pub use collection::{ArrayRepr, MapRepr};
pub use optional::OptionalRepr;
pub use primitive::{NativePrimitive, PrimitiveRepr};
pub use proxy::ProxyRepr;
pub use traits::{Representation, ReprExt};
