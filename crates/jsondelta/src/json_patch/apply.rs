//! JSON Patch apply logic.
//!
//! Every operation resolves its path to `(container, last token)` through
//! the pointer crate and then acts on the container. Pointer failures become
//! [`PatchError::Conflict`], except under `test` where they become
//! [`PatchError::TestFailed`].

use jsondelta_pointer::{
    get, parse_index, resolve_to_parent, resolve_to_parent_mut, value_kind, walk, ArrayIndex,
    Pointer,
};
use serde_json::{Number, Value};
use tracing::trace;

use super::operation::Operation;
use super::types::PatchError;

// ── Individual operation applicators ─────────────────────────────────────

fn unresolvable(path: &Pointer, token: &str) -> PatchError {
    PatchError::Conflict(format!(
        "unable to fully resolve json pointer {path}, part {token}"
    ))
}

fn apply_add(doc: &mut Value, path: &Pointer, value: Value) -> Result<(), PatchError> {
    let (container, last) = resolve_to_parent_mut(doc, path).map_err(PatchError::conflict)?;
    let Some(token) = last else {
        // Root: object and array documents are replaced wholesale.
        if container.is_object() || container.is_array() {
            *container = value;
            return Ok(());
        }
        return Err(PatchError::InvalidDocument(format!(
            "invalid document type {}",
            value_kind(container)
        )));
    };
    match container {
        Value::Array(arr) => match parse_index(token).map_err(PatchError::conflict)? {
            ArrayIndex::End => arr.push(value),
            ArrayIndex::At(idx) if idx <= arr.len() => arr.insert(idx, value),
            ArrayIndex::At(_) => {
                return Err(PatchError::Conflict("can't insert outside of list".into()))
            }
        },
        Value::Object(map) => {
            map.insert(token.to_string(), value);
        }
        _ => return Err(unresolvable(path, token)),
    }
    Ok(())
}

fn apply_remove(doc: &mut Value, path: &Pointer) -> Result<Value, PatchError> {
    let (container, last) = resolve_to_parent_mut(doc, path).map_err(PatchError::conflict)?;
    let Some(token) = last else {
        return Err(PatchError::Conflict("can't remove the whole document".into()));
    };
    let missing = || PatchError::Conflict(format!("can't remove a non-existent object '{token}'"));
    match container {
        Value::Array(arr) => match parse_index(token).map_err(PatchError::conflict)? {
            ArrayIndex::At(idx) if idx < arr.len() => Ok(arr.remove(idx)),
            _ => Err(missing()),
        },
        Value::Object(map) => map.shift_remove(token).ok_or_else(missing),
        _ => Err(unresolvable(path, token)),
    }
}

fn apply_replace(doc: &mut Value, path: &Pointer, value: Value) -> Result<(), PatchError> {
    let (container, last) = resolve_to_parent_mut(doc, path).map_err(PatchError::conflict)?;
    let Some(token) = last else {
        *container = value;
        return Ok(());
    };
    match container {
        Value::Array(arr) => {
            if token == "-" {
                return Err(PatchError::InvalidPatch(
                    "'path' with '-' can't be applied to 'replace' operation".into(),
                ));
            }
            match parse_index(token).map_err(PatchError::conflict)? {
                ArrayIndex::At(idx) if idx < arr.len() => arr[idx] = value,
                _ => return Err(PatchError::Conflict("can't replace outside of list".into())),
            }
        }
        Value::Object(map) => match map.get_mut(token) {
            Some(slot) => *slot = value,
            None => {
                return Err(PatchError::Conflict(format!(
                    "can't replace a non-existent object '{token}'"
                )))
            }
        },
        _ => return Err(unresolvable(path, token)),
    }
    Ok(())
}

fn apply_move(doc: &mut Value, from: &Pointer, path: &Pointer) -> Result<(), PatchError> {
    let (container, last) = resolve_to_parent(doc, from).map_err(PatchError::conflict)?;
    let Some(token) = last else {
        return Err(PatchError::Conflict("can't move the whole document".into()));
    };
    walk(container, token).map_err(PatchError::conflict)?;
    if from == path {
        return Ok(());
    }
    if container.is_object() && from.contains(path) {
        return Err(PatchError::Conflict(
            "Cannot move values into their own children".into(),
        ));
    }
    let value = apply_remove(doc, from)?;
    apply_add(doc, path, value)
}

fn apply_copy(doc: &mut Value, from: &Pointer, path: &Pointer) -> Result<(), PatchError> {
    let value = get(doc, from).map_err(PatchError::conflict)?.clone();
    apply_add(doc, path, value)
}

fn apply_test(doc: &Value, path: &Pointer, value: &Value) -> Result<(), PatchError> {
    let actual = get(doc, path).map_err(PatchError::test_failed)?;
    if !json_equal(actual, value) {
        return Err(PatchError::TestFailed(format!(
            "{actual} ({}) is not equal to tested value {value} ({})",
            value_kind(actual),
            value_kind(value)
        )));
    }
    Ok(())
}

// ── Equality ──────────────────────────────────────────────────────────────

/// Value equality as RFC 6902 `test` defines it: numbers compare by
/// numeric value (`1 == 1.0`), everything else structurally.
pub fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| json_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, l)| y.get(k).is_some_and(|r| json_equal(l, r)))
        }
        _ => a == b,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

// ── Public API ────────────────────────────────────────────────────────────

/// Apply a single operation to `doc` in place.
///
/// On error the document may hold a partial result only for `move`, whose
/// add step can fail after its remove step succeeded.
pub fn apply_op(doc: &mut Value, op: &Operation) -> Result<(), PatchError> {
    trace!(op = op.op_name(), path = %op.path(), "applying operation");
    match op {
        Operation::Add { path, value } => apply_add(doc, path, value.clone()),
        Operation::Remove { path } => apply_remove(doc, path).map(drop),
        Operation::Replace { path, value } => apply_replace(doc, path, value.clone()),
        Operation::Move { from, path } => apply_move(doc, from, path),
        Operation::Copy { from, path } => apply_copy(doc, from, path),
        Operation::Test { path, value } => apply_test(doc, path, value),
    }
}

/// Apply operations in order, stopping at the first failure.
pub fn apply_ops(doc: &mut Value, ops: &[Operation]) -> Result<(), PatchError> {
    for op in ops {
        apply_op(doc, op)?;
    }
    Ok(())
}

impl Operation {
    /// Apply this operation to an owned document and return the result.
    pub fn apply(&self, mut doc: Value) -> Result<Value, PatchError> {
        apply_op(&mut doc, self)?;
        Ok(doc)
    }
}
