//! Pairing indices for move inference.
//!
//! Each index maps a value to the ledger nodes that removed (or added) an
//! equal value and are still waiting for a partner. Scalars are hashed by
//! kind and value so that `1`, `1.0` and `true` never pair; arrays and
//! objects fall back to a linear scan.

use std::collections::HashMap;

use serde_json::{Number, Value};

use super::ledger::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ValueKey {
    Null,
    Bool(bool),
    PosInt(u64),
    NegInt(i64),
    /// Bit pattern, with `-0.0` folded into `0.0`.
    Float(u64),
    Text(String),
}

impl ValueKey {
    fn of(value: &Value) -> Option<Self> {
        let key = match value {
            Value::Null => ValueKey::Null,
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Number(n) => number_key(n),
            Value::String(s) => ValueKey::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => return None,
        };
        Some(key)
    }
}

fn number_key(n: &Number) -> ValueKey {
    if let Some(u) = n.as_u64() {
        ValueKey::PosInt(u)
    } else if let Some(i) = n.as_i64() {
        ValueKey::NegInt(i)
    } else {
        let f = n.as_f64().unwrap_or(0.0);
        ValueKey::Float(if f == 0.0 { 0.0f64.to_bits() } else { f.to_bits() })
    }
}

/// A stack of waiting nodes per value. The most recent match is taken first.
#[derive(Debug, Default)]
pub(crate) struct PendingIndex {
    hashed: HashMap<ValueKey, Vec<NodeId>>,
    scanned: Vec<(Value, NodeId)>,
}

impl PendingIndex {
    pub fn store(&mut self, value: &Value, id: NodeId) {
        match ValueKey::of(value) {
            Some(key) => self.hashed.entry(key).or_default().push(id),
            None => self.scanned.push((value.clone(), id)),
        }
    }

    pub fn take(&mut self, value: &Value) -> Option<NodeId> {
        match ValueKey::of(value) {
            Some(key) => self.hashed.get_mut(&key).and_then(Vec::pop),
            None => {
                let pos = self.scanned.iter().rposition(|(stored, _)| stored == value)?;
                Some(self.scanned.remove(pos).1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_pair_by_kind() {
        let mut index = PendingIndex::default();
        index.store(&json!(1), 10);
        index.store(&json!(true), 11);
        index.store(&json!("1"), 12);
        index.store(&json!(1.0), 13);
        assert_eq!(index.take(&json!(true)), Some(11));
        assert_eq!(index.take(&json!(1)), Some(10));
        assert_eq!(index.take(&json!(1)), None);
        assert_eq!(index.take(&json!(1.0)), Some(13));
        assert_eq!(index.take(&json!("1")), Some(12));
    }

    #[test]
    fn test_most_recent_first() {
        let mut index = PendingIndex::default();
        index.store(&json!(null), 1);
        index.store(&json!(null), 2);
        assert_eq!(index.take(&json!(null)), Some(2));
        assert_eq!(index.take(&json!(null)), Some(1));
        assert_eq!(index.take(&json!(null)), None);
    }

    #[test]
    fn test_containers_scan() {
        let mut index = PendingIndex::default();
        index.store(&json!({"a": [1]}), 1);
        index.store(&json!([1]), 2);
        index.store(&json!({"a": [1]}), 3);
        assert_eq!(index.take(&json!({"a": [1]})), Some(3));
        assert_eq!(index.take(&json!([true])), None);
        assert_eq!(index.take(&json!([1])), Some(2));
        assert_eq!(index.take(&json!({"a": [1]})), Some(1));
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        let mut index = PendingIndex::default();
        index.store(&json!(-0.0), 4);
        assert_eq!(index.take(&json!(0.0)), Some(4));
    }

    #[test]
    fn test_negative_ints() {
        let mut index = PendingIndex::default();
        index.store(&json!(-3), 4);
        assert_eq!(index.take(&json!(3)), None);
        assert_eq!(index.take(&json!(-3)), Some(4));
    }
}
