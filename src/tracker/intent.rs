use std::fmt;

use serde::{Deserialize, Serialize};

/// A slot in the forest: parent list plus zero-based index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub parent_id: Option<String>,
    pub index: usize,
}

/// One normalized reordering. `new_index` is the item's final position among
/// its new siblings, counted after it has left its old slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveIntent {
    pub item_id: String,
    pub old_parent_id: Option<String>,
    pub new_parent_id: Option<String>,
    pub old_index: usize,
    pub new_index: usize,
}

impl MoveIntent {
    pub fn origin(&self) -> Location {
        Location {
            parent_id: self.old_parent_id.clone(),
            index: self.old_index,
        }
    }

    pub fn changes_parent(&self) -> bool {
        self.old_parent_id != self.new_parent_id
    }

    pub fn is_noop(&self) -> bool {
        !self.changes_parent() && self.old_index == self.new_index
    }

    /// The move that puts the item back where it came from.
    pub fn inverse(&self) -> MoveIntent {
        MoveIntent {
            item_id: self.item_id.clone(),
            old_parent_id: self.new_parent_id.clone(),
            new_parent_id: self.old_parent_id.clone(),
            old_index: self.new_index,
            new_index: self.old_index,
        }
    }
}

impl fmt::Display for MoveIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent = |p: &Option<String>| p.clone().unwrap_or_else(|| "root".to_string());
        write!(
            f,
            "{}: {}[{}] -> {}[{}]",
            self.item_id,
            parent(&self.old_parent_id),
            self.old_index,
            parent(&self.new_parent_id),
            self.new_index
        )
    }
}
