use serde::{Deserialize, Serialize};

/// A node in the item forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Opaque unique id
    pub id: String,
    /// Display title
    pub title: String,
    /// Completion flag (carried through, not used for ordering)
    #[serde(default)]
    pub done: bool,
    /// Containing item, or `None` for a root item
    pub parent_id: Option<String>,
    /// Child ids in sibling order
    #[serde(default)]
    pub children: Vec<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, title: impl Into<String>, parent_id: Option<String>) -> Self {
        Item {
            id: id.into(),
            title: title.into(),
            done: false,
            parent_id,
            children: Vec::new(),
        }
    }
}
