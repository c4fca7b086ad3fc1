//! Core types for the JSON Patch module.

use jsondelta_pointer::PointerError;
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────

/// Failure raised while building or applying a patch.
///
/// Application is fail-fast: the first error aborts the remaining
/// operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    /// The instruction record is malformed.
    #[error("invalid patch: {0}")]
    InvalidPatch(String),
    /// The instruction is well-formed but cannot be satisfied by the document.
    #[error("conflict: {0}")]
    Conflict(String),
    /// A `test` operation did not hold.
    #[error("test failed: {0}")]
    TestFailed(String),
    /// A root `add` against a document that is neither object nor array.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

impl PatchError {
    pub(crate) fn conflict(err: PointerError) -> Self {
        PatchError::Conflict(err.to_string())
    }

    pub(crate) fn test_failed(err: PointerError) -> Self {
        PatchError::TestFailed(err.to_string())
    }
}

// ── Options ───────────────────────────────────────────────────────────────

/// Options for [`crate::apply_patch_with`] and [`crate::Patch::apply_with`].
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// If true, operate directly on the caller's document; a failure partway
    /// through leaves the earlier operations applied.
    /// If false, clone the document before applying.
    pub in_place: bool,
}
