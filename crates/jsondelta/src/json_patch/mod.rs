//! JSON Patch implementation (RFC 6902).
//!
//! # Operations
//!
//! All standard RFC 6902 operations are supported:
//! `add`, `remove`, `replace`, `move`, `copy`, `test`.
//!
//! A [`Patch`] is validated when it is built; applying it runs the
//! operations in order and stops at the first error.

pub mod apply;
pub mod codec;
pub mod operation;
pub mod patch;
pub mod types;

pub use apply::{apply_op, apply_ops, json_equal};
pub use codec::json::{from_json, from_json_patch, to_json, to_json_patch};
pub use operation::Operation;
pub use patch::{apply_patch, apply_patch_with, IntoPatch, Patch};
pub use types::{ApplyOptions, PatchError};
