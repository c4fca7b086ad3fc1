#![allow(dead_code)]

use jsondelta::{make_patch, Patch, PatchError};
use serde_json::Value;

pub fn apply(doc: &Value, records: Value) -> Result<Value, PatchError> {
    Patch::from_value(&records)?.apply(doc)
}

/// Diff `src` against `dst`, check the patch reproduces `dst`, and return
/// its record array.
pub fn diff_roundtrip(src: &Value, dst: &Value) -> Value {
    let patch = make_patch(src, dst);
    let out = patch
        .apply(src)
        .unwrap_or_else(|e| panic!("patch {patch} failed on {src}: {e}"));
    assert_eq!(&out, dst, "patch {patch} applied to {src}");
    patch.to_value()
}

pub fn op_names(records: &Value) -> Vec<String> {
    records
        .as_array()
        .map(|ops| {
            ops.iter()
                .filter_map(|op| op["op"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
