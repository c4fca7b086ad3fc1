//! JSON codec for JSON Patch operations.
//!
//! Converts operations to and from the RFC 6902 instruction records, i.e.
//! `{"op": "add", "path": "/a", "value": 1}`. Decoding validates every
//! required member up front; members the operation does not use are ignored.

use jsondelta_pointer::{value_kind, Pointer};
use serde_json::{json, Map, Value};

use crate::json_patch::operation::Operation;
use crate::json_patch::types::PatchError;

// ── Member helpers ────────────────────────────────────────────────────────

fn decode_pointer(record: &Map<String, Value>, member: &str) -> Result<Pointer, PatchError> {
    let raw = record
        .get(member)
        .ok_or_else(|| PatchError::InvalidPatch(missing_member(member)))?;
    let s = raw
        .as_str()
        .ok_or_else(|| PatchError::InvalidPatch(format!("Invalid '{member}'")))?;
    Pointer::parse(s).map_err(|e| PatchError::InvalidPatch(format!("Invalid '{member}': {e}")))
}

fn decode_value(record: &Map<String, Value>) -> Result<Value, PatchError> {
    record
        .get("value")
        .cloned()
        .ok_or_else(|| PatchError::InvalidPatch(missing_member("value")))
}

fn missing_member(member: &str) -> String {
    if member == "path" {
        "Operation must have a 'path' member".to_string()
    } else {
        format!("The operation does not contain a '{member}' member")
    }
}

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize an [`Operation`] to its instruction record.
pub fn to_json(op: &Operation) -> Value {
    match op {
        Operation::Add { path, value } => json!({
            "op": "add",
            "path": path.to_string(),
            "value": value
        }),
        Operation::Remove { path } => json!({
            "op": "remove",
            "path": path.to_string()
        }),
        Operation::Replace { path, value } => json!({
            "op": "replace",
            "path": path.to_string(),
            "value": value
        }),
        Operation::Move { from, path } => json!({
            "op": "move",
            "from": from.to_string(),
            "path": path.to_string()
        }),
        Operation::Copy { from, path } => json!({
            "op": "copy",
            "from": from.to_string(),
            "path": path.to_string()
        }),
        Operation::Test { path, value } => json!({
            "op": "test",
            "path": path.to_string(),
            "value": value
        }),
    }
}

/// Serialize a sequence of operations to a record array.
pub fn to_json_patch(ops: &[Operation]) -> Value {
    Value::Array(ops.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Deserialize one instruction record.
pub fn from_json(record: &Value) -> Result<Operation, PatchError> {
    let record = match record {
        Value::Object(map) => map,
        Value::String(_) => {
            return Err(PatchError::InvalidPatch(
                "Document is expected to be sequence of operations, got a sequence of strings."
                    .into(),
            ))
        }
        other => {
            return Err(PatchError::InvalidPatch(format!(
                "Operation must be an object, got {}",
                value_kind(other)
            )))
        }
    };

    let op = record
        .get("op")
        .ok_or_else(|| PatchError::InvalidPatch("Operation does not contain 'op' member".into()))?;
    let op = op
        .as_str()
        .ok_or_else(|| PatchError::InvalidPatch("Operation's op must be a string".into()))?;
    if !matches!(op, "add" | "remove" | "replace" | "move" | "copy" | "test") {
        return Err(PatchError::InvalidPatch(format!("Unknown operation '{op}'")));
    }

    let path = decode_pointer(record, "path")?;
    let op = match op {
        "add" => Operation::Add {
            path,
            value: decode_value(record)?,
        },
        "remove" => Operation::Remove { path },
        "replace" => Operation::Replace {
            path,
            value: decode_value(record)?,
        },
        "move" => Operation::Move {
            from: decode_pointer(record, "from")?,
            path,
        },
        "copy" => Operation::Copy {
            from: decode_pointer(record, "from")?,
            path,
        },
        _ => Operation::Test {
            path,
            value: decode_value(record)?,
        },
    };
    Ok(op)
}

/// Deserialize a record array.
pub fn from_json_patch(patch: &Value) -> Result<Vec<Operation>, PatchError> {
    let records = patch.as_array().ok_or_else(|| {
        PatchError::InvalidPatch(format!(
            "Document is expected to be sequence of operations, got {}",
            value_kind(patch)
        ))
    })?;
    records.iter().map(from_json).collect()
}
