//! JSON Pointer (RFC 6901) utilities.
//!
//! This crate parses, formats and resolves
//! [JSON Pointers (RFC 6901)](https://tools.ietf.org/html/rfc6901) against
//! `serde_json::Value` documents. It is the addressing layer of the
//! `jsondelta` patch engine.
//!
//! # Example
//!
//! ```
//! use jsondelta_pointer::{get, Pointer};
//!
//! let pointer = Pointer::parse("/foo/bar").unwrap();
//! assert_eq!(pointer.tokens(), ["foo", "bar"]);
//! assert_eq!(pointer.to_string(), "/foo/bar");
//!
//! let doc = serde_json::json!({"foo": {"bar": 42}});
//! assert_eq!(get(&doc, &pointer).unwrap(), &serde_json::json!(42));
//! ```

use thiserror::Error;

pub mod find;
pub mod types;
pub mod util;
pub mod validate;

pub use find::{contains, get, resolve_to_parent, resolve_to_parent_mut, walk, walk_mut};
pub use types::{parse_index, ArrayIndex, Pointer};
pub use util::{
    escape_component, format_json_pointer, is_valid_index, parse_json_pointer, unescape_component,
    value_kind,
};
pub use validate::validate_json_pointer;

/// Errors raised while parsing or resolving a pointer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("invalid pointer {pointer:?}: {reason}")]
    Invalid {
        pointer: String,
        reason: &'static str,
    },
    #[error("member {0:?} not found")]
    NotFound(String),
    #[error("{0:?} is not a valid array index")]
    InvalidIndex(String),
    #[error("index {0} is out of bounds")]
    OutOfBounds(usize),
    #[error("cannot descend into a {0}")]
    NotIndexable(&'static str),
}
