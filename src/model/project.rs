use super::document::{ProjectDoc, TaskDoc};
use super::tree::{ItemTree, TreeError};

/// A loaded project: its identity plus the ordered item forest
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    /// Project id; root tasks name it as their parent in the document
    pub id: String,
    pub name: String,
    pub tree: ItemTree,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Project {
            id: id.into(),
            name: name.into(),
            tree: ItemTree::new(),
        }
    }

    /// Build a project from its document. Nesting decides parentage; the
    /// `parentId` fields are checked separately by `ops::check`.
    pub fn from_document(doc: &ProjectDoc) -> Result<Self, TreeError> {
        let mut project = Project::new(doc.id.clone(), doc.name.clone());
        add_tasks(&mut project.tree, &doc.tasks, None)?;
        Ok(project)
    }

    /// Serialize back to a document, renumbering every sibling list from zero.
    pub fn to_document(&self) -> ProjectDoc {
        ProjectDoc {
            id: self.id.clone(),
            name: self.name.clone(),
            tasks: self.task_docs(self.tree.roots(), &self.id),
        }
    }

    fn task_docs(&self, ids: &[String], parent_id: &str) -> Vec<TaskDoc> {
        ids.iter()
            .enumerate()
            .filter_map(|(index, id)| {
                let item = self.tree.get(id)?;
                Some(TaskDoc {
                    id: item.id.clone(),
                    parent_id: parent_id.to_string(),
                    name: item.title.clone(),
                    index,
                    is_done: item.done,
                    subtasks: self.task_docs(&item.children, &item.id),
                })
            })
            .collect()
    }
}

fn add_tasks(
    tree: &mut ItemTree,
    tasks: &[TaskDoc],
    parent: Option<&str>,
) -> Result<(), TreeError> {
    let mut ordered: Vec<&TaskDoc> = tasks.iter().collect();
    ordered.sort_by_key(|t| t.index);
    for task in ordered {
        tree.push(task.id.clone(), task.name.clone(), parent)?.done = task.is_done;
        add_tasks(tree, &task.subtasks, Some(&task.id))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::TreeIndex;

    fn doc() -> ProjectDoc {
        serde_json::from_str(
            r#"{"_id": "p1", "name": "Home", "tasks": [
                {"_id": "C", "parentId": "p1", "name": "Gamma", "index": 1},
                {"_id": "A", "parentId": "p1", "name": "Alpha", "index": 0, "subtasks": [
                    {"_id": "B", "parentId": "A", "name": "Beta", "index": 0, "isDone": true}
                ]}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn from_document_orders_by_index() {
        let project = Project::from_document(&doc()).unwrap();
        assert_eq!(project.tree.roots(), ["A", "C"]);
        assert_eq!(project.tree.parent_of("B"), Some(Some("A")));
        assert!(project.tree.get("B").unwrap().done);
    }

    #[test]
    fn to_document_renumbers_and_sets_parent_ids() {
        let project = Project::from_document(&doc()).unwrap();
        let out = project.to_document();
        assert_eq!(out.tasks[0].id, "A");
        assert_eq!(out.tasks[0].parent_id, "p1");
        assert_eq!(out.tasks[1].index, 1);
        assert_eq!(out.tasks[0].subtasks[0].parent_id, "A");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut d = doc();
        d.tasks[0].id = "A".into();
        assert_eq!(
            Project::from_document(&d),
            Err(TreeError::DuplicateId("A".into()))
        );
    }
}
