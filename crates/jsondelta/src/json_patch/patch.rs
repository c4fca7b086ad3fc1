//! The `Patch` container: an ordered, validated sequence of operations.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use super::apply::apply_ops;
use super::codec::json::{from_json_patch, to_json_patch};
use super::codec::multidict;
use super::operation::Operation;
use super::types::{ApplyOptions, PatchError};
use crate::json_patch_diff::{make_patch_with, DiffOptions};

/// An ordered sequence of [`Operation`]s.
///
/// Two patches are equal when their instruction records are equal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    ops: Vec<Operation>,
}

impl Patch {
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    /// Build a patch from a record array, validating every record.
    pub fn from_value(records: &Value) -> Result<Self, PatchError> {
        from_json_patch(records).map(Self::new)
    }

    /// Parse patch text. Repeated members inside a record are folded into
    /// an array, so `{"op": "add", "op": "remove"}` is rejected rather than
    /// silently read as a `remove`.
    ///
    /// ```
    /// use jsondelta::{Patch, PatchError};
    ///
    /// let patch = Patch::from_string(r#"[{"op": "remove", "path": "/a"}]"#).unwrap();
    /// assert_eq!(patch.len(), 1);
    ///
    /// let err = Patch::from_string(r#"[{"op": "add", "op": "remove", "path": "/a"}]"#);
    /// assert!(matches!(err, Err(PatchError::InvalidPatch(_))));
    /// ```
    pub fn from_string(text: &str) -> Result<Self, PatchError> {
        let records =
            multidict::from_str(text).map_err(|e| PatchError::InvalidPatch(e.to_string()))?;
        Self::from_value(&records)
    }

    /// The patch transforming `src` into `dst`.
    pub fn from_diff(src: &Value, dst: &Value) -> Self {
        make_patch_with(src, dst, &DiffOptions::default())
    }

    pub fn from_diff_with(src: &Value, dst: &Value, options: &DiffOptions) -> Self {
        make_patch_with(src, dst, options)
    }

    /// The record array of this patch.
    pub fn to_value(&self) -> Value {
        to_json_patch(&self.ops)
    }

    pub fn operations(&self) -> &[Operation] {
        &self.ops
    }

    pub fn into_operations(self) -> Vec<Operation> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.ops.iter()
    }

    /// Apply to a copy of `doc`. The caller's document is never touched.
    pub fn apply(&self, doc: &Value) -> Result<Value, PatchError> {
        let mut out = doc.clone();
        self.apply_in_place(&mut out)?;
        Ok(out)
    }

    /// Apply directly to `doc`. Operations that ran before a failure stay
    /// applied.
    pub fn apply_in_place(&self, doc: &mut Value) -> Result<(), PatchError> {
        apply_ops(doc, &self.ops)?;
        debug!(ops = self.ops.len(), "patch applied");
        Ok(())
    }

    /// Apply to `doc` according to `options`. Without `in_place` the
    /// document is only replaced once every operation has succeeded.
    pub fn apply_with(&self, doc: &mut Value, options: &ApplyOptions) -> Result<(), PatchError> {
        if options.in_place {
            return self.apply_in_place(doc);
        }
        *doc = self.apply(doc)?;
        Ok(())
    }
}

impl fmt::Display for Patch {
    /// Compact JSON text of the record array.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

impl From<Vec<Operation>> for Patch {
    fn from(ops: Vec<Operation>) -> Self {
        Self::new(ops)
    }
}

impl FromIterator<Operation> for Patch {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Patch {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl Serialize for Patch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.ops.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Patch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Value::deserialize(deserializer)?;
        Self::from_value(&records).map_err(serde::de::Error::custom)
    }
}

// ── Patch sources ─────────────────────────────────────────────────────────

/// Anything a patch can be read from: a built [`Patch`], a record array, or
/// patch text.
pub trait IntoPatch {
    fn into_patch(self) -> Result<Patch, PatchError>;
}

impl IntoPatch for Patch {
    fn into_patch(self) -> Result<Patch, PatchError> {
        Ok(self)
    }
}

impl IntoPatch for &Patch {
    fn into_patch(self) -> Result<Patch, PatchError> {
        Ok(self.clone())
    }
}

impl IntoPatch for Vec<Operation> {
    fn into_patch(self) -> Result<Patch, PatchError> {
        Ok(Patch::new(self))
    }
}

impl IntoPatch for &Value {
    fn into_patch(self) -> Result<Patch, PatchError> {
        Patch::from_value(self)
    }
}

impl IntoPatch for Value {
    fn into_patch(self) -> Result<Patch, PatchError> {
        Patch::from_value(&self)
    }
}

impl IntoPatch for &str {
    fn into_patch(self) -> Result<Patch, PatchError> {
        Patch::from_string(self)
    }
}

impl IntoPatch for &String {
    fn into_patch(self) -> Result<Patch, PatchError> {
        Patch::from_string(self)
    }
}

/// Apply `patch` to a copy of `doc`.
///
/// ```
/// use serde_json::json;
///
/// let doc = json!({});
/// let patch = json!([{"op": "add", "path": "/foo", "value": "bar"}]);
/// assert_eq!(jsondelta::apply_patch(&doc, &patch).unwrap(), json!({"foo": "bar"}));
/// assert_eq!(doc, json!({}));
/// ```
pub fn apply_patch<P: IntoPatch>(doc: &Value, patch: P) -> Result<Value, PatchError> {
    patch.into_patch()?.apply(doc)
}

/// Apply `patch` to `doc` according to `options`.
pub fn apply_patch_with<P: IntoPatch>(
    doc: &mut Value,
    patch: P,
    options: &ApplyOptions,
) -> Result<(), PatchError> {
    patch.into_patch()?.apply_with(doc, options)
}
