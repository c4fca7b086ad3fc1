//! Codecs for JSON Patch operations.

pub mod json;
pub mod multidict;
