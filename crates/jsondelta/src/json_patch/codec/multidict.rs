//! Duplicate-key aware JSON loading.
//!
//! `serde_json` keeps the last of several members sharing a name. Patch text
//! is parsed with this loader instead, which folds every repeated member into
//! an array of its values in order of appearance, so a record such as
//! `{"op": "add", "op": "remove"}` reads as `{"op": ["add", "remove"]}` and
//! is then rejected by the record decoder.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};

/// Parse JSON text, folding duplicate object members into arrays.
pub fn from_str(text: &str) -> Result<Value, serde_json::Error> {
    let MultiValue(value) = serde_json::from_str(text)?;
    Ok(value)
}

struct MultiValue(Value);

impl<'de> Deserialize<'de> for MultiValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MultiVisitor).map(MultiValue)
    }
}

struct MultiVisitor;

impl<'de> Visitor<'de> for MultiVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any valid JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Number::from_f64(v).map_or(Value::Null, Value::Number))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        MultiValue::deserialize(deserializer).map(|MultiValue(v)| v)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(MultiValue(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut grouped: IndexMap<String, Vec<Value>> = IndexMap::new();
        while let Some((key, MultiValue(value))) = access.next_entry::<String, MultiValue>()? {
            grouped.entry(key).or_default().push(value);
        }
        let map: Map<String, Value> = grouped
            .into_iter()
            .map(|(key, mut values)| {
                let value = if values.len() == 1 {
                    values.swap_remove(0)
                } else {
                    Value::Array(values)
                };
                (key, value)
            })
            .collect();
        Ok(Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_document_unchanged() {
        let text = r#"{"b": [1, 2.5, null, true], "a": {"c": "d"}}"#;
        let value = from_str(text).unwrap();
        assert_eq!(value, serde_json::from_str::<Value>(text).unwrap());
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_duplicates_fold_into_array() {
        let value = from_str(r#"{"op": "add", "path": "/a", "op": "remove"}"#).unwrap();
        assert_eq!(value, json!({"op": ["add", "remove"], "path": "/a"}));
    }

    #[test]
    fn test_nested_duplicates() {
        let value = from_str(r#"[{"x": {"y": 1, "y": 2, "y": 3}}]"#).unwrap();
        assert_eq!(value, json!([{"x": {"y": [1, 2, 3]}}]));
    }

    #[test]
    fn test_syntax_error() {
        assert!(from_str("[{").is_err());
    }
}
