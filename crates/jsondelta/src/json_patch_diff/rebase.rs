//! Index rebasing for pending operations.
//!
//! When the diff engine collapses a removal and an addition into a move, the
//! collapsed entry disappears from the middle of the ledger. Every entry
//! queued after it was computed against an array that still had (or still
//! lacked) that element, so its index on the same array must shift by one.
//! Each hook receives the affected array's pointer and the collapsed
//! entry's current index, adjusts its own index if it sits above that
//! position, and otherwise returns an adjusted index for the next entry.
//!
//! Only entries whose parent is the affected array and whose last token
//! reads as an integer take part; object keys are never rebased.

use jsondelta_pointer::Pointer;

use crate::json_patch::Operation;

#[derive(Clone, Copy)]
struct Rule {
    /// Own index equal to the affected index also counts as "above".
    inclusive: bool,
    /// Applied to the own index when it is above.
    own: i64,
    /// Applied to the affected index otherwise.
    other: i64,
}

const REMOVE_UNDO_REMOVE: Rule = Rule { inclusive: true, own: 1, other: -1 };
const REMOVE_UNDO_ADD: Rule = Rule { inclusive: false, own: -1, other: -1 };
const ADD_UNDO_REMOVE: Rule = Rule { inclusive: false, own: 1, other: 1 };
const ADD_UNDO_ADD: Rule = Rule { inclusive: false, own: -1, other: 1 };

fn rebase(location: &mut Pointer, parent: &Pointer, key: i64, rule: Rule) -> i64 {
    let same_parent = location
        .tokens()
        .split_last()
        .is_some_and(|(_, init)| init == parent.tokens());
    if !same_parent {
        return key;
    }
    let Some(own) = location.last_index() else {
        return key;
    };
    let above = if rule.inclusive { own >= key } else { own > key };
    if above {
        location.set_last((own + rule.own).to_string());
        key
    } else {
        key + rule.other
    }
}

impl Operation {
    /// Rebase against a removal at `parent/key` that is being taken back.
    pub(crate) fn on_undo_remove(&mut self, parent: &Pointer, key: i64) -> i64 {
        match self {
            Operation::Remove { path } => rebase(path, parent, key, REMOVE_UNDO_REMOVE),
            Operation::Add { path, .. } => rebase(path, parent, key, ADD_UNDO_REMOVE),
            Operation::Move { from, path } => {
                let key = rebase(from, parent, key, REMOVE_UNDO_REMOVE);
                rebase(path, parent, key, ADD_UNDO_REMOVE)
            }
            // Replace is never rebased.
            Operation::Replace { .. } | Operation::Copy { .. } | Operation::Test { .. } => key,
        }
    }

    /// Rebase against an addition at `parent/key` that is being taken back.
    pub(crate) fn on_undo_add(&mut self, parent: &Pointer, key: i64) -> i64 {
        match self {
            Operation::Remove { path } => rebase(path, parent, key, REMOVE_UNDO_ADD),
            Operation::Add { path, .. } => rebase(path, parent, key, ADD_UNDO_ADD),
            Operation::Move { from, path } => {
                let key = rebase(from, parent, key, REMOVE_UNDO_ADD);
                rebase(path, parent, key, ADD_UNDO_ADD)
            }
            Operation::Replace { .. } | Operation::Copy { .. } | Operation::Test { .. } => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ptr(s: &str) -> Pointer {
        Pointer::parse(s).unwrap()
    }

    fn remove(p: &str) -> Operation {
        Operation::Remove { path: ptr(p) }
    }

    fn add(p: &str) -> Operation {
        Operation::Add {
            path: ptr(p),
            value: json!(0),
        }
    }

    #[test]
    fn test_remove_on_undo_remove() {
        let arr = ptr("/a");
        // own >= key: own shifts up, key passes through
        let mut op = remove("/a/2");
        assert_eq!(op.on_undo_remove(&arr, 2), 2);
        assert_eq!(op.path(), &ptr("/a/3"));
        // own < key: key shifts down
        let mut op = remove("/a/1");
        assert_eq!(op.on_undo_remove(&arr, 2), 1);
        assert_eq!(op.path(), &ptr("/a/1"));
    }

    #[test]
    fn test_remove_on_undo_add() {
        let arr = ptr("/a");
        let mut op = remove("/a/3");
        assert_eq!(op.on_undo_add(&arr, 2), 2);
        assert_eq!(op.path(), &ptr("/a/2"));
        let mut op = remove("/a/2");
        assert_eq!(op.on_undo_add(&arr, 2), 1);
        assert_eq!(op.path(), &ptr("/a/2"));
    }

    #[test]
    fn test_add_on_undo_remove_is_strict() {
        let arr = ptr("/a");
        let mut op = add("/a/2");
        assert_eq!(op.on_undo_remove(&arr, 2), 3);
        assert_eq!(op.path(), &ptr("/a/2"));
        let mut op = add("/a/4");
        assert_eq!(op.on_undo_remove(&arr, 2), 2);
        assert_eq!(op.path(), &ptr("/a/5"));
    }

    #[test]
    fn test_add_on_undo_add() {
        let arr = ptr("/a");
        let mut op = add("/a/4");
        assert_eq!(op.on_undo_add(&arr, 2), 2);
        assert_eq!(op.path(), &ptr("/a/3"));
        let mut op = add("/a/1");
        assert_eq!(op.on_undo_add(&arr, 2), 3);
        assert_eq!(op.path(), &ptr("/a/1"));
    }

    #[test]
    fn test_move_rebases_from_then_path() {
        let arr = ptr("/a");
        let mut op = Operation::Move {
            from: ptr("/a/1"),
            path: ptr("/a/5"),
        };
        // from 1 < 3: key becomes 2; path 5 > 2: path becomes 6
        assert_eq!(op.on_undo_remove(&arr, 3), 2);
        assert_eq!(
            op,
            Operation::Move {
                from: ptr("/a/1"),
                path: ptr("/a/6"),
            }
        );

        let mut op = Operation::Move {
            from: ptr("/a/4"),
            path: ptr("/a/0"),
        };
        // from 4 > 2: from becomes 3; path 0 <= 2: key becomes 3
        assert_eq!(op.on_undo_add(&arr, 2), 3);
        assert_eq!(
            op,
            Operation::Move {
                from: ptr("/a/3"),
                path: ptr("/a/0"),
            }
        );
    }

    #[test]
    fn test_replace_hooks_pass_through() {
        let arr = ptr("/a");
        let mut op = Operation::Replace {
            path: ptr("/a/5"),
            value: json!(1),
        };
        assert_eq!(op.on_undo_remove(&arr, 1), 1);
        assert_eq!(op.on_undo_add(&arr, 1), 1);
        assert_eq!(op.path(), &ptr("/a/5"));
    }

    #[test]
    fn test_other_parents_and_object_keys_untouched() {
        let mut op = remove("/b/2");
        assert_eq!(op.on_undo_remove(&ptr("/a"), 0), 0);
        assert_eq!(op.path(), &ptr("/b/2"));

        let mut op = remove("/a/x");
        assert_eq!(op.on_undo_add(&ptr("/a"), 0), 0);
        assert_eq!(op.path(), &ptr("/a/x"));

        // A nested path below the array is not a sibling entry.
        let mut op = remove("/a/3/0");
        assert_eq!(op.on_undo_remove(&ptr("/a"), 1), 1);
        assert_eq!(op.path(), &ptr("/a/3/0"));
    }
}
