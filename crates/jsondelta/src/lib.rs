//! jsondelta: JSON Patch (RFC 6902) for `serde_json` documents.
//!
//! Two halves:
//!
//! - [`json_patch`] parses, validates and applies patches.
//! - [`json_patch_diff`] synthesizes the patch between two documents,
//!   folding matching removals and additions into `move` operations.
//!
//! Pointers (RFC 6901) live in the `jsondelta-pointer` crate.
//!
//! ```
//! use serde_json::json;
//!
//! let src = json!({"numbers": [1, 3, 4, 8]});
//! let dst = json!({"numbers": [1, 4, 7]});
//! let patch = jsondelta::make_patch(&src, &dst);
//! assert_eq!(jsondelta::apply_patch(&src, &patch).unwrap(), dst);
//! ```

pub mod json_cli;
pub mod json_patch;
pub mod json_patch_diff;

pub use json_patch::{
    apply_patch, apply_patch_with, json_equal, ApplyOptions, IntoPatch, Operation, Patch,
    PatchError,
};
pub use json_patch_diff::{canonical_dumps, make_patch, make_patch_with, DiffEngine, DiffOptions, Dumps};
pub use jsondelta_pointer::{Pointer, PointerError};
