use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::tree::{ItemTree, TreeError};
use crate::tracker::{Location, MoveIntent, TreeIndex};

/// Error type for applying a move to the tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("item not found: {0}")]
    NotFound(String),
    #[error("stale move for {item_id}: expected it at {expected}, found it at {found}")]
    Stale {
        item_id: String,
        expected: String,
        found: String,
    },
    #[error("unknown parent: {0}")]
    UnknownParent(String),
    #[error("cannot move {item_id} into its own subtree ({parent_id})")]
    IntoOwnSubtree { item_id: String, parent_id: String },
    #[error("index {index} out of range for {len} siblings")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// New position of one item, as the remote store records it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(rename = "_id")]
    pub id: String,
    pub parent_id: Option<String>,
    pub index: usize,
}

/// Apply `intent` to the tree. The intent must describe where the item is
/// now; anything else is rejected as stale. Returns one update per item
/// whose parent or index changed, the moved item included.
pub fn apply_move(tree: &mut ItemTree, intent: &MoveIntent) -> Result<Vec<OrderUpdate>, MoveError> {
    let id = intent.item_id.as_str();
    let current = current_location(tree, id)?;
    let origin = intent.origin();
    if current != origin {
        return Err(MoveError::Stale {
            item_id: id.to_string(),
            expected: describe(&origin),
            found: describe(&current),
        });
    }

    let new_parent = intent.new_parent_id.as_deref();
    if let Some(parent) = new_parent {
        if !tree.contains(parent) {
            return Err(MoveError::UnknownParent(parent.to_string()));
        }
        if parent == id || tree.is_descendant(parent, id) {
            return Err(MoveError::IntoOwnSubtree {
                item_id: id.to_string(),
                parent_id: parent.to_string(),
            });
        }
    }

    let mut len = tree.children_of(new_parent).len();
    if !intent.changes_parent() {
        len -= 1;
    }
    if intent.new_index > len {
        return Err(MoveError::IndexOutOfRange {
            index: intent.new_index,
            len,
        });
    }
    if intent.is_noop() {
        return Ok(Vec::new());
    }

    let mut lists = vec![intent.old_parent_id.clone()];
    if intent.changes_parent() {
        lists.push(intent.new_parent_id.clone());
    }
    let before: HashMap<String, Location> = positions(tree, &lists).into_iter().collect();

    tree.detach(id)?;
    tree.attach(id, new_parent, intent.new_index)?;

    let updates = positions(tree, &lists)
        .into_iter()
        .filter(|(item, loc)| before.get(item) != Some(loc))
        .map(|(item, loc)| OrderUpdate {
            id: item,
            parent_id: loc.parent_id,
            index: loc.index,
        })
        .collect();
    Ok(updates)
}

fn current_location(tree: &ItemTree, id: &str) -> Result<Location, MoveError> {
    let not_found = || MoveError::NotFound(id.to_string());
    let parent = tree.parent_of(id).ok_or_else(not_found)?;
    let index = tree.index_of(id).ok_or_else(not_found)?;
    Ok(Location {
        parent_id: parent.map(str::to_string),
        index,
    })
}

fn positions(tree: &ItemTree, parents: &[Option<String>]) -> Vec<(String, Location)> {
    parents
        .iter()
        .flat_map(|parent| {
            tree.children_of(parent.as_deref())
                .iter()
                .enumerate()
                .map(move |(index, child)| {
                    (
                        child.clone(),
                        Location {
                            parent_id: parent.clone(),
                            index,
                        },
                    )
                })
        })
        .collect()
}

fn describe(loc: &Location) -> String {
    format!("{}[{}]", loc.parent_id.as_deref().unwrap_or("root"), loc.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A -> [B, C], B -> [D]; E is a second root
    fn sample() -> ItemTree {
        let mut tree = ItemTree::new();
        tree.push("A", "Alpha", None).unwrap();
        tree.push("B", "Beta", Some("A")).unwrap();
        tree.push("C", "Gamma", Some("A")).unwrap();
        tree.push("D", "Delta", Some("B")).unwrap();
        tree.push("E", "Epsilon", None).unwrap();
        tree
    }

    fn intent(item: &str, old: (Option<&str>, usize), new: (Option<&str>, usize)) -> MoveIntent {
        MoveIntent {
            item_id: item.to_string(),
            old_parent_id: old.0.map(str::to_string),
            new_parent_id: new.0.map(str::to_string),
            old_index: old.1,
            new_index: new.1,
        }
    }

    fn update(id: &str, parent: Option<&str>, index: usize) -> OrderUpdate {
        OrderUpdate {
            id: id.to_string(),
            parent_id: parent.map(str::to_string),
            index,
        }
    }

    #[test]
    fn reorder_within_parent() {
        let mut tree = sample();
        let updates = apply_move(&mut tree, &intent("B", (Some("A"), 0), (Some("A"), 1))).unwrap();
        assert_eq!(tree.children_of(Some("A")), ["C", "B"]);
        assert_eq!(
            updates,
            vec![update("C", Some("A"), 0), update("B", Some("A"), 1)]
        );
    }

    #[test]
    fn reparent_carries_subtree() {
        let mut tree = sample();
        let updates = apply_move(&mut tree, &intent("B", (Some("A"), 0), (None, 1))).unwrap();
        assert_eq!(tree.roots(), ["A", "B", "E"]);
        assert_eq!(tree.children_of(Some("A")), ["C"]);
        assert_eq!(tree.parent_of("D"), Some(Some("B")));
        assert_eq!(
            updates,
            vec![
                update("C", Some("A"), 0),
                update("B", None, 1),
                update("E", None, 2),
            ]
        );
    }

    #[test]
    fn inverse_restores_the_tree() {
        let original = sample();
        let mut tree = original.clone();
        let m = intent("D", (Some("B"), 0), (Some("A"), 2));
        apply_move(&mut tree, &m).unwrap();
        assert_eq!(tree.children_of(Some("A")), ["B", "C", "D"]);
        apply_move(&mut tree, &m.inverse()).unwrap();
        assert_eq!(tree, original);
    }

    #[test]
    fn stale_intent_is_rejected() {
        let mut tree = sample();
        let err = apply_move(&mut tree, &intent("C", (Some("A"), 0), (None, 0))).unwrap_err();
        assert_eq!(
            err,
            MoveError::Stale {
                item_id: "C".into(),
                expected: "A[0]".into(),
                found: "A[1]".into(),
            }
        );
    }

    #[test]
    fn move_into_own_subtree_is_rejected() {
        let mut tree = sample();
        let err = apply_move(&mut tree, &intent("A", (None, 0), (Some("D"), 0))).unwrap_err();
        assert!(matches!(err, MoveError::IntoOwnSubtree { .. }));
        let err = apply_move(&mut tree, &intent("A", (None, 0), (Some("A"), 0))).unwrap_err();
        assert!(matches!(err, MoveError::IntoOwnSubtree { .. }));
        assert_eq!(tree, sample());
    }

    #[test]
    fn index_past_end_is_rejected() {
        let mut tree = sample();
        let err = apply_move(&mut tree, &intent("B", (Some("A"), 0), (Some("A"), 2))).unwrap_err();
        assert_eq!(err, MoveError::IndexOutOfRange { index: 2, len: 1 });
        let err = apply_move(&mut tree, &intent("E", (None, 1), (Some("C"), 1))).unwrap_err();
        assert_eq!(err, MoveError::IndexOutOfRange { index: 1, len: 0 });
    }

    #[test]
    fn unknown_item_and_parent() {
        let mut tree = sample();
        assert_eq!(
            apply_move(&mut tree, &intent("Z", (None, 0), (None, 1))).unwrap_err(),
            MoveError::NotFound("Z".into())
        );
        assert_eq!(
            apply_move(&mut tree, &intent("E", (None, 1), (Some("Z"), 0))).unwrap_err(),
            MoveError::UnknownParent("Z".into())
        );
    }

    #[test]
    fn noop_changes_nothing() {
        let mut tree = sample();
        let updates = apply_move(&mut tree, &intent("C", (Some("A"), 1), (Some("A"), 1))).unwrap();
        assert!(updates.is_empty());
        assert_eq!(tree, sample());
    }
}
