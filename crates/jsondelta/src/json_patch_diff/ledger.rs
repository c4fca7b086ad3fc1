//! The operation ledger: the working list of a diff in progress.
//!
//! An arena-backed doubly-linked list. Slot 0 is a sentinel that closes the
//! ring; every other slot owns one pending operation. Nodes are unlinked in
//! O(1) while other nodes keep their ids, so the pairing indices can hold
//! node ids across mutations.

use crate::json_patch::Operation;

pub(crate) type NodeId = usize;

const SENTINEL: NodeId = 0;

#[derive(Debug, Clone, Copy)]
struct Link {
    prev: NodeId,
    next: NodeId,
    linked: bool,
}

#[derive(Debug)]
pub(crate) struct Entry {
    pub op: Operation,
    /// The operation addresses an array slot.
    pub indexed: bool,
}

#[derive(Debug)]
pub(crate) struct OperationLedger {
    links: Vec<Link>,
    /// `entries[id - 1]` belongs to node `id`.
    entries: Vec<Entry>,
}

impl OperationLedger {
    pub fn new() -> Self {
        Self {
            links: vec![Link {
                prev: SENTINEL,
                next: SENTINEL,
                linked: true,
            }],
            entries: Vec::new(),
        }
    }

    /// Append an operation at the tail.
    pub fn push_back(&mut self, op: Operation, indexed: bool) -> NodeId {
        let id = self.links.len();
        let last = self.links[SENTINEL].prev;
        self.links.push(Link {
            prev: last,
            next: SENTINEL,
            linked: true,
        });
        self.links[last].next = id;
        self.links[SENTINEL].prev = id;
        self.entries.push(Entry { op, indexed });
        id
    }

    /// Detach a node. Its entry stays readable.
    pub fn unlink(&mut self, id: NodeId) {
        debug_assert!(id != SENTINEL && self.links[id].linked);
        let Link { prev, next, .. } = self.links[id];
        self.links[prev].next = next;
        self.links[next].prev = prev;
        self.links[id].linked = false;
    }

    pub fn entry(&self, id: NodeId) -> &Entry {
        &self.entries[id - 1]
    }

    pub fn entry_mut(&mut self, id: NodeId) -> &mut Entry {
        &mut self.entries[id - 1]
    }

    /// The node following `id`, `None` at the tail.
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        match self.links[id].next {
            SENTINEL => None,
            next => Some(next),
        }
    }

    pub fn first(&self) -> Option<NodeId> {
        self.next(SENTINEL)
    }

    /// Consume the ledger into its final operation list, collapsing every
    /// `remove` directly followed by an `add` on the same path into a
    /// `replace`.
    pub fn finalize(self) -> Vec<Operation> {
        let order: Vec<NodeId> = std::iter::successors(self.first(), |&id| self.next(id)).collect();
        let mut slots: Vec<Option<Operation>> =
            self.entries.into_iter().map(|entry| Some(entry.op)).collect();
        let ordered = order.into_iter().filter_map(|id| slots[id - 1].take());

        let mut out = Vec::new();
        let mut ops = ordered.peekable();
        while let Some(op) = ops.next() {
            if let Operation::Remove { path } = &op {
                let coalesce = matches!(ops.peek(), Some(Operation::Add { path: added, .. }) if added == path);
                if coalesce {
                    if let Some(Operation::Add { path, value }) = ops.next() {
                        out.push(Operation::Replace { path, value });
                        continue;
                    }
                }
            }
            out.push(op);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsondelta_pointer::Pointer;
    use serde_json::json;

    fn remove(p: &str) -> Operation {
        Operation::Remove {
            path: Pointer::parse(p).unwrap(),
        }
    }

    fn add(p: &str, value: serde_json::Value) -> Operation {
        Operation::Add {
            path: Pointer::parse(p).unwrap(),
            value,
        }
    }

    #[test]
    fn test_push_and_unlink() {
        let mut ledger = OperationLedger::new();
        let a = ledger.push_back(remove("/a"), false);
        let b = ledger.push_back(remove("/b"), false);
        let c = ledger.push_back(remove("/c"), false);
        assert_eq!(ledger.first(), Some(a));
        assert_eq!(ledger.next(a), Some(b));

        ledger.unlink(b);
        assert_eq!(ledger.next(a), Some(c));
        assert_eq!(ledger.next(c), None);
        // Unlinked entries are still addressable.
        assert_eq!(ledger.entry(b).op, remove("/b"));

        ledger.unlink(a);
        ledger.unlink(c);
        assert_eq!(ledger.first(), None);
        assert!(ledger.finalize().is_empty());
    }

    #[test]
    fn test_push_after_unlink_appends_at_tail() {
        let mut ledger = OperationLedger::new();
        let a = ledger.push_back(remove("/a"), false);
        ledger.push_back(remove("/b"), false);
        ledger.unlink(a);
        ledger.push_back(remove("/c"), false);
        assert_eq!(ledger.finalize(), vec![remove("/b"), remove("/c")]);
    }

    #[test]
    fn test_finalize_coalesces_remove_add() {
        let mut ledger = OperationLedger::new();
        ledger.push_back(remove("/0"), true);
        ledger.push_back(add("/0", json!(9)), true);
        ledger.push_back(remove("/1"), true);
        ledger.push_back(add("/2", json!(8)), true);
        let ops = ledger.finalize();
        assert_eq!(
            ops,
            vec![
                Operation::Replace {
                    path: Pointer::parse("/0").unwrap(),
                    value: json!(9),
                },
                remove("/1"),
                add("/2", json!(8)),
            ]
        );
    }

    #[test]
    fn test_finalize_needs_adjacency() {
        let mut ledger = OperationLedger::new();
        ledger.push_back(remove("/0"), true);
        let mid = ledger.push_back(remove("/5"), true);
        ledger.push_back(add("/0", json!(1)), true);
        ledger.unlink(mid);
        // Adjacent once `mid` is gone.
        assert_eq!(ledger.finalize().len(), 1);
    }
}
