//! Conversions between Primitive and JSON for the disk store's file format.
//!
//! JSON has no native blob or path shape, and no non-finite numbers, so
//! those are written as single-key tagged objects (`{"$blob": "<base64>"}`,
//! `{"$path": "..."}`, `{"$float": "NaN"}`). A stored map whose only entry
//! uses one of the tag keys would be misread on load; the tags are chosen
//! to make that collision unlikely in practice for a preferences-style
//! store. Paths are written via `to_string_lossy`, so a non-UTF-8 path
//! does not survive a reload byte-for-byte.

use std::collections::BTreeMap;

use base64::Engine;
use serde_json::Value as JsonValue;

use duokv_substrate::Primitive;

const BLOB_TAG: &str = "$blob";
const PATH_TAG: &str = "$path";
const FLOAT_TAG: &str = "$float";

pub(crate) fn primitive_to_json(primitive: &Primitive) -> JsonValue {
    match primitive {
        Primitive::Bool(b) => JsonValue::Bool(*b),
        Primitive::Integer(i) => JsonValue::Number((*i).into()),
        Primitive::Float(f) => match serde_json::Number::from_f64(*f) {
            Some(n) => JsonValue::Number(n),
            // NaN and infinities have no JSON number; tag them like blobs
            // so one non-finite entry cannot corrupt the whole file.
            None => serde_json::json!({ "$float": f.to_string() }),
        },
        Primitive::Text(s) => JsonValue::String(s.clone()),
        Primitive::Blob(bytes) => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
            serde_json::json!({ "$blob": encoded })
        }
        Primitive::PathRef(path) => {
            serde_json::json!({ "$path": path.to_string_lossy() })
        }
        Primitive::Array(items) => {
            JsonValue::Array(items.iter().map(primitive_to_json).collect())
        }
        Primitive::Map(entries) => JsonValue::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), primitive_to_json(v)))
                .collect(),
        ),
    }
}

/// Returns `None` for JSON shapes the substrate cannot hold (null, or a
/// malformed tagged object).
pub(crate) fn json_to_primitive(json: &JsonValue) -> Option<Primitive> {
    match json {
        JsonValue::Null => None,
        JsonValue::Bool(b) => Some(Primitive::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Primitive::Integer(i))
            } else {
                n.as_f64().map(Primitive::Float)
            }
        }
        JsonValue::String(s) => Some(Primitive::Text(s.clone())),
        JsonValue::Array(items) => items
            .iter()
            .map(json_to_primitive)
            .collect::<Option<Vec<_>>>()
            .map(Primitive::Array),
        JsonValue::Object(entries) => {
            if entries.len() == 1 {
                if let Some(JsonValue::String(encoded)) = entries.get(BLOB_TAG) {
                    let bytes = base64::engine::general_purpose::STANDARD
                        .decode(encoded)
                        .ok()?;
                    return Some(Primitive::Blob(bytes));
                }
                if let Some(JsonValue::String(path)) = entries.get(PATH_TAG) {
                    return Some(Primitive::PathRef(path.into()));
                }
                if let Some(JsonValue::String(text)) = entries.get(FLOAT_TAG) {
                    return text.parse().ok().map(Primitive::Float);
                }
            }

            entries
                .iter()
                .map(|(k, v)| json_to_primitive(v).map(|p| (k.clone(), p)))
                .collect::<Option<BTreeMap<_, _>>>()
                .map(Primitive::Map)
        }
    }
}
