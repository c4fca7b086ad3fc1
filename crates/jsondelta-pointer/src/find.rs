use serde_json::Value;

use crate::types::{parse_index, ArrayIndex, Pointer};
use crate::util::value_kind;
use crate::PointerError;

/// Descend one step into `container`.
///
/// Array containers take canonical index tokens only; `-` names the slot
/// past the end and never resolves to a value.
pub fn walk<'a>(container: &'a Value, token: &str) -> Result<&'a Value, PointerError> {
    match container {
        Value::Array(arr) => match parse_index(token)? {
            ArrayIndex::At(idx) => arr.get(idx).ok_or(PointerError::OutOfBounds(idx)),
            ArrayIndex::End => Err(PointerError::OutOfBounds(arr.len())),
        },
        Value::Object(map) => map
            .get(token)
            .ok_or_else(|| PointerError::NotFound(token.to_string())),
        other => Err(PointerError::NotIndexable(value_kind(other))),
    }
}

/// Mutable counterpart of [`walk`].
pub fn walk_mut<'a>(container: &'a mut Value, token: &str) -> Result<&'a mut Value, PointerError> {
    match container {
        Value::Array(arr) => match parse_index(token)? {
            ArrayIndex::At(idx) => arr.get_mut(idx).ok_or(PointerError::OutOfBounds(idx)),
            ArrayIndex::End => Err(PointerError::OutOfBounds(arr.len())),
        },
        Value::Object(map) => map
            .get_mut(token)
            .ok_or_else(|| PointerError::NotFound(token.to_string())),
        other => Err(PointerError::NotIndexable(value_kind(other))),
    }
}

/// Resolve everything but the last token.
///
/// Returns the container that holds the target and the target's token.
/// The token is `None` only for the root pointer, in which case the
/// container is the document itself. The target itself is not required to
/// exist.
///
/// ```
/// use jsondelta_pointer::{resolve_to_parent, Pointer};
/// use serde_json::json;
///
/// let doc = json!({"a": {"b": [1, 2]}});
/// let pointer = Pointer::parse("/a/b/5").unwrap();
/// let (container, last) = resolve_to_parent(&doc, &pointer).unwrap();
/// assert_eq!(container, &json!([1, 2]));
/// assert_eq!(last, Some("5"));
/// ```
pub fn resolve_to_parent<'a, 'p>(
    doc: &'a Value,
    pointer: &'p Pointer,
) -> Result<(&'a Value, Option<&'p str>), PointerError> {
    let Some((last, init)) = pointer.tokens().split_last() else {
        return Ok((doc, None));
    };
    let mut current = doc;
    for token in init {
        current = walk(current, token)?;
    }
    Ok((current, Some(last.as_str())))
}

/// Mutable counterpart of [`resolve_to_parent`].
pub fn resolve_to_parent_mut<'a, 'p>(
    doc: &'a mut Value,
    pointer: &'p Pointer,
) -> Result<(&'a mut Value, Option<&'p str>), PointerError> {
    let Some((last, init)) = pointer.tokens().split_last() else {
        return Ok((doc, None));
    };
    let mut current = doc;
    for token in init {
        current = walk_mut(current, token)?;
    }
    Ok((current, Some(last.as_str())))
}

/// Resolve a pointer to the value it addresses.
pub fn get<'a>(doc: &'a Value, pointer: &Pointer) -> Result<&'a Value, PointerError> {
    pointer
        .tokens()
        .iter()
        .try_fold(doc, |current, token| walk(current, token))
}

/// True if `descendant` is `ancestor` or lies beneath it.
pub fn contains(ancestor: &Pointer, descendant: &Pointer) -> bool {
    ancestor.contains(descendant)
}
