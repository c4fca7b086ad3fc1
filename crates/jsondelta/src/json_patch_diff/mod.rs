//! JSON Patch diff: synthesize the operations that turn one document into
//! another.
//!
//! The comparison walks both trees together and records additions, removals
//! and replacements in an operation ledger. When a value removed in one
//! place is added in another (in either order) the pair collapses into a
//! single `move`, and every pending array index queued behind the collapsed
//! entry is rebased.

mod ledger;
mod pending;
mod rebase;

use std::fmt;

use jsondelta_pointer::Pointer;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::json_patch::{Operation, Patch};
use ledger::{NodeId, OperationLedger};
use pending::PendingIndex;

// ── Options ───────────────────────────────────────────────────────────────

/// Serializer used to decide whether two scalars differ.
pub type Dumps = fn(&Value) -> String;

/// Compact `serde_json` text, the default [`Dumps`].
pub fn canonical_dumps(value: &Value) -> String {
    value.to_string()
}

/// Options for [`make_patch_with`].
#[derive(Clone, Copy)]
pub struct DiffOptions {
    /// Two non-container values are equal when they serialize identically.
    pub dumps: Dumps,
    /// Collapse matching removals and additions into `move` operations.
    pub infer_moves: bool,
    /// Apply the synthesized patch to the source and, if the result is not
    /// the destination, diff again without move inference.
    pub verify: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            dumps: canonical_dumps,
            infer_moves: true,
            verify: true,
        }
    }
}

impl fmt::Debug for DiffOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffOptions")
            .field("infer_moves", &self.infer_moves)
            .field("verify", &self.verify)
            .finish_non_exhaustive()
    }
}

// ── Engine ────────────────────────────────────────────────────────────────

/// Last token of an added or removed location.
#[derive(Clone, Copy)]
enum Slot<'a> {
    Index(usize),
    Key(&'a str),
}

impl Slot<'_> {
    fn is_index(self) -> bool {
        matches!(self, Slot::Index(_))
    }

    fn locate(self, parent: &Pointer) -> Pointer {
        match self {
            Slot::Index(idx) => parent.join(idx.to_string()),
            Slot::Key(key) => parent.join(key),
        }
    }
}

/// One structural comparison. The ledger and both pairing indices live for
/// a single [`DiffEngine::compare`] call.
pub struct DiffEngine {
    options: DiffOptions,
    ledger: OperationLedger,
    pending_removed: PendingIndex,
    pending_added: PendingIndex,
}

impl DiffEngine {
    pub fn new(options: DiffOptions) -> Self {
        Self {
            options,
            ledger: OperationLedger::new(),
            pending_removed: PendingIndex::default(),
            pending_added: PendingIndex::default(),
        }
    }

    /// Compare `src` with `dst` and return the patch between them.
    ///
    /// The result is not verified; see [`make_patch_with`].
    pub fn compare(mut self, src: &Value, dst: &Value) -> Patch {
        self.compare_values(&Pointer::root(), src, dst);
        Patch::new(self.ledger.finalize())
    }

    fn compare_values(&mut self, location: &Pointer, src: &Value, dst: &Value) {
        match (src, dst) {
            (Value::Object(s), Value::Object(d)) => self.compare_objects(location, s, d),
            (Value::Array(s), Value::Array(d)) => self.compare_arrays(location, s, d),
            _ => {
                let dumps = self.options.dumps;
                if dumps(src) != dumps(dst) {
                    self.item_replaced(location, dst);
                }
            }
        }
    }

    fn compare_objects(&mut self, path: &Pointer, src: &Map<String, Value>, dst: &Map<String, Value>) {
        for (key, value) in src {
            if !dst.contains_key(key) {
                self.item_removed(path, Slot::Key(key), value);
            }
        }
        for (key, value) in dst {
            if !src.contains_key(key) {
                self.item_added(path, Slot::Key(key), value);
            }
        }
        for (key, old) in src {
            if let Some(new) = dst.get(key) {
                self.compare_values(&path.join(key.as_str()), old, new);
            }
        }
    }

    fn compare_arrays(&mut self, path: &Pointer, src: &[Value], dst: &[Value]) {
        let (len_src, len_dst) = (src.len(), dst.len());
        let min_len = len_src.min(len_dst);
        for k in 0..len_src.max(len_dst) {
            if k < min_len {
                let (old, new) = (&src[k], &dst[k]);
                if old == new {
                    continue;
                }
                match (old, new) {
                    (Value::Object(o), Value::Object(n)) => {
                        self.compare_objects(&path.join(k.to_string()), o, n)
                    }
                    (Value::Array(o), Value::Array(n)) => {
                        self.compare_arrays(&path.join(k.to_string()), o, n)
                    }
                    _ => {
                        self.item_removed(path, Slot::Index(k), old);
                        self.item_added(path, Slot::Index(k), new);
                    }
                }
            } else if len_src > len_dst {
                // The array shrinks as the tail goes, so every removal hits
                // the same position.
                self.item_removed(path, Slot::Index(len_dst), &src[k]);
            } else {
                self.item_added(path, Slot::Index(k), &dst[k]);
            }
        }
    }

    // ── Ledger mutations ──────────────────────────────────────────────────

    fn item_added(&mut self, parent: &Pointer, slot: Slot<'_>, value: &Value) {
        let target = slot.locate(parent);
        if self.options.infer_moves {
            if let Some(removed) = self.pending_removed.take(value) {
                if self.ledger.entry(removed).indexed && slot.is_index() {
                    self.rebase_after(removed, Operation::on_undo_remove);
                }
                let from = self.ledger.entry(removed).op.path().clone();
                self.ledger.unlink(removed);
                trace!(from = %from, path = %target, "paired addition with earlier removal");
                if from != target {
                    self.ledger
                        .push_back(Operation::Move { from, path: target }, slot.is_index());
                }
                return;
            }
        }
        let id = self.ledger.push_back(
            Operation::Add {
                path: target,
                value: value.clone(),
            },
            slot.is_index(),
        );
        if self.options.infer_moves {
            self.pending_added.store(value, id);
        }
    }

    fn item_removed(&mut self, parent: &Pointer, slot: Slot<'_>, value: &Value) {
        let id = self
            .ledger
            .push_back(Operation::Remove { path: slot.locate(parent) }, slot.is_index());
        if !self.options.infer_moves {
            return;
        }
        let Some(added) = self.pending_added.take(value) else {
            self.pending_removed.store(value, id);
            return;
        };
        if self.ledger.entry(added).indexed {
            self.rebase_after(added, Operation::on_undo_add);
        }
        let to = self.ledger.entry(added).op.path().clone();
        self.ledger.unlink(added);
        let from = self.ledger.entry(id).op.path().clone();
        trace!(from = %from, path = %to, "paired removal with earlier addition");
        if from == to {
            self.ledger.unlink(id);
        } else {
            self.ledger.entry_mut(id).op = Operation::Move { from, path: to };
        }
    }

    fn item_replaced(&mut self, location: &Pointer, value: &Value) {
        self.ledger.push_back(
            Operation::Replace {
                path: location.clone(),
                value: value.clone(),
            },
            false,
        );
    }

    /// Thread the index of `anchor` through every node queued after it,
    /// letting each rebase itself, then store the final index on `anchor`.
    fn rebase_after(&mut self, anchor: NodeId, hook: fn(&mut Operation, &Pointer, i64) -> i64) {
        let path = self.ledger.entry(anchor).op.path();
        let Some(mut key) = path.last_index() else {
            return;
        };
        let parent = path.parent();
        let mut cursor = self.ledger.next(anchor);
        while let Some(id) = cursor {
            key = hook(&mut self.ledger.entry_mut(id).op, &parent, key);
            cursor = self.ledger.next(id);
        }
        self.ledger.entry_mut(anchor).op.set_key(key);
    }
}

// ── Public API ────────────────────────────────────────────────────────────

/// The patch transforming `src` into `dst`, with default options.
///
/// ```
/// use serde_json::json;
///
/// let src = json!({"a": [1, 2, 3]});
/// let dst = json!({"a": [2, 3, 1]});
/// let patch = jsondelta::make_patch(&src, &dst);
/// assert_eq!(patch.to_string(), r#"[{"op":"move","from":"/a/0","path":"/a/2"}]"#);
/// assert_eq!(patch.apply(&src).unwrap(), dst);
/// ```
pub fn make_patch(src: &Value, dst: &Value) -> Patch {
    make_patch_with(src, dst, &DiffOptions::default())
}

/// The patch transforming `src` into `dst`.
///
/// Move inference is sound for flat and sibling arrays; a move across
/// nesting levels can leave later indices stale. With `verify` set, such a
/// patch is detected and the diff is redone without move inference, so the
/// result always applies to `src` and yields `dst`.
pub fn make_patch_with(src: &Value, dst: &Value, options: &DiffOptions) -> Patch {
    let patch = DiffEngine::new(*options).compare(src, dst);
    if options.verify && options.infer_moves {
        let sound = patch.apply(src).is_ok_and(|out| out == *dst);
        if !sound {
            debug!(
                ops = patch.len(),
                "synthesized patch does not reproduce the target, retrying without moves"
            );
            let fallback = DiffOptions {
                infer_moves: false,
                ..*options
            };
            return DiffEngine::new(fallback).compare(src, dst);
        }
    }
    debug!(ops = patch.len(), "patch synthesized");
    patch
}
