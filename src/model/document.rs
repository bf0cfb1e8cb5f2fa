use serde::{Deserialize, Serialize};

/// On-disk project document, in the shape the task backend serves it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<TaskDoc>,
}

/// A task and its nested subtasks.
///
/// Root tasks carry the project id as `parentId`. Siblings are ordered by
/// `index`; ties keep document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDoc {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub parent_id: String,
    pub name: String,
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<TaskDoc>,
}
