//! Type definitions for JSON Pointer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::util::{format_json_pointer, is_valid_index, parse_json_pointer};
use crate::validate::validate_json_pointer;
use crate::PointerError;

/// A parsed JSON Pointer: the ordered, unescaped tokens of a location.
///
/// The empty token list is the document root. Tokens are kept as text;
/// whether a token is an array index or an object key is decided by the
/// container it is resolved against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer {
    tokens: Vec<String>,
}

impl Pointer {
    /// The root pointer (`""`).
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse and validate a pointer string.
    ///
    /// ```
    /// use jsondelta_pointer::Pointer;
    ///
    /// let p = Pointer::parse("/foo/0").unwrap();
    /// assert_eq!(p.tokens(), ["foo", "0"]);
    /// assert!(Pointer::parse("foo").is_err());
    /// ```
    pub fn parse(pointer: &str) -> Result<Self, PointerError> {
        validate_json_pointer(pointer)?;
        Ok(Self {
            tokens: parse_json_pointer(pointer),
        })
    }

    /// Build a pointer from already-unescaped tokens.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// All tokens but the last. The root is its own parent.
    pub fn parent(&self) -> Pointer {
        match self.tokens.split_last() {
            Some((_, init)) => Self {
                tokens: init.to_vec(),
            },
            None => Self::root(),
        }
    }

    /// The last token, `None` for the root.
    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// The last token coerced to an integer, when it is numeric.
    pub fn last_index(&self) -> Option<i64> {
        self.last().and_then(|t| t.parse().ok())
    }

    /// Overwrite the last token. On the root this appends a first token.
    pub fn set_last(&mut self, token: impl Into<String>) {
        match self.tokens.last_mut() {
            Some(last) => *last = token.into(),
            None => self.tokens.push(token.into()),
        }
    }

    /// A new pointer one level deeper.
    pub fn join(&self, token: impl Into<String>) -> Pointer {
        let mut tokens = Vec::with_capacity(self.tokens.len() + 1);
        tokens.extend_from_slice(&self.tokens);
        tokens.push(token.into());
        Self { tokens }
    }

    /// True if `other` is this location or lies beneath it.
    pub fn contains(&self, other: &Pointer) -> bool {
        other.tokens.starts_with(&self.tokens)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_json_pointer(&self.tokens))
    }
}

impl FromStr for Pointer {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Pointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// An array position named by a token: an element index or the `-` end marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayIndex {
    At(usize),
    End,
}

/// Interpret a token against an array.
///
/// ```
/// use jsondelta_pointer::{parse_index, ArrayIndex};
///
/// assert_eq!(parse_index("3").unwrap(), ArrayIndex::At(3));
/// assert_eq!(parse_index("-").unwrap(), ArrayIndex::End);
/// assert!(parse_index("03").is_err());
/// ```
pub fn parse_index(token: &str) -> Result<ArrayIndex, PointerError> {
    if token == "-" {
        return Ok(ArrayIndex::End);
    }
    if !is_valid_index(token) {
        return Err(PointerError::InvalidIndex(token.to_string()));
    }
    token
        .parse()
        .map(ArrayIndex::At)
        .map_err(|_| PointerError::InvalidIndex(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_parent_and_last() {
        let p = Pointer::parse("/a/b/2").unwrap();
        assert_eq!(p.parent(), Pointer::from_tokens(["a", "b"]));
        assert_eq!(p.last(), Some("2"));
        assert_eq!(p.last_index(), Some(2));
        assert_eq!(Pointer::root().parent(), Pointer::root());
        assert_eq!(Pointer::root().last(), None);
    }

    #[test]
    fn test_pointer_set_last() {
        let mut p = Pointer::parse("/a/3").unwrap();
        p.set_last("4");
        assert_eq!(p.to_string(), "/a/4");
        p.set_last("-1");
        assert_eq!(p.last_index(), Some(-1));
    }

    #[test]
    fn test_pointer_contains() {
        let from = Pointer::parse("/a").unwrap();
        let path = Pointer::parse("/a/b").unwrap();
        assert!(from.contains(&path));
        assert!(from.contains(&from));
        assert!(!path.contains(&from));
        assert!(Pointer::root().contains(&path));
        // Token-wise, not textual: "/ab" is not under "/a"
        assert!(!from.contains(&Pointer::parse("/ab").unwrap()));
    }

    #[test]
    fn test_pointer_display_escapes() {
        let p = Pointer::from_tokens(["a/b", "m~n"]);
        assert_eq!(p.to_string(), "/a~1b/m~0n");
        assert_eq!(Pointer::parse(&p.to_string()).unwrap(), p);
    }

    #[test]
    fn test_pointer_serde_as_string() {
        let p = Pointer::parse("/x/0").unwrap();
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v, serde_json::json!("/x/0"));
        let back: Pointer = serde_json::from_value(v).unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_value::<Pointer>(serde_json::json!("x")).is_err());
    }
}
