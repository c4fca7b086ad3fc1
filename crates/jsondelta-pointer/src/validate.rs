//! Validation functions for JSON Pointer strings.

use crate::PointerError;

/// Validate a JSON Pointer string.
///
/// # Errors
///
/// Returns [`PointerError::Invalid`] if:
/// - The pointer is non-empty but doesn't start with `/`
/// - A `~` is not followed by `0` or `1`
///
/// # Example
///
/// ```
/// use jsondelta_pointer::validate_json_pointer;
///
/// validate_json_pointer("").unwrap();  // Root is valid
/// validate_json_pointer("/foo/bar").unwrap();
/// validate_json_pointer("foo").unwrap_err();  // Missing leading /
/// validate_json_pointer("/a~2").unwrap_err();  // Unknown escape
/// ```
pub fn validate_json_pointer(pointer: &str) -> Result<(), PointerError> {
    if pointer.is_empty() {
        return Ok(());
    }
    if !pointer.starts_with('/') {
        return Err(PointerError::Invalid {
            pointer: pointer.to_string(),
            reason: "location must start with /",
        });
    }
    let mut chars = pointer.chars();
    while let Some(c) = chars.next() {
        if c == '~' && !matches!(chars.next(), Some('0') | Some('1')) {
            return Err(PointerError::Invalid {
                pointer: pointer.to_string(),
                reason: "found invalid escape sequence",
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_absolute_pointer() {
        assert!(validate_json_pointer("/").is_ok());
        assert!(validate_json_pointer("/foo").is_ok());
        assert!(validate_json_pointer("/foo/bar").is_ok());
        assert!(validate_json_pointer("/m~0n/a~1b").is_ok());
    }

    #[test]
    fn test_validate_relative_pointer() {
        assert!(validate_json_pointer("foo").is_err());
        assert!(validate_json_pointer("foo/bar").is_err());
    }

    #[test]
    fn test_validate_escapes() {
        assert!(validate_json_pointer("/a~").is_err());
        assert!(validate_json_pointer("/a~2b").is_err());
        assert!(validate_json_pointer("/~~0").is_err());
    }
}
