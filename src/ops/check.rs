use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::model::document::{ProjectDoc, TaskDoc};

/// Structured result from `reorder check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A validation error (the document cannot be loaded as-is).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// The same id appears more than once
    #[serde(rename = "duplicate_id")]
    DuplicateId { task_id: String, count: usize },
    /// `parentId` disagrees with where the task is nested
    #[serde(rename = "parent_mismatch")]
    ParentMismatch {
        task_id: String,
        declared: String,
        actual: String,
    },
}

/// A validation warning (loading renumbers it away).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// Two siblings claim the same index
    #[serde(rename = "duplicate_index")]
    DuplicateIndex {
        parent_id: String,
        index: usize,
        task_ids: Vec<String>,
    },
    /// Sibling indexes skip a value
    #[serde(rename = "index_gap")]
    IndexGap {
        parent_id: String,
        expected: usize,
        found: usize,
    },
}

/// Validate a project document.
pub fn check_document(doc: &ProjectDoc) -> CheckResult {
    let mut result = CheckResult::default();
    let mut seen: HashMap<&str, usize> = HashMap::new();
    check_siblings(&doc.tasks, &doc.id, &mut seen, &mut result);

    let mut duplicates: Vec<(&str, usize)> = seen.into_iter().filter(|(_, n)| *n > 1).collect();
    duplicates.sort();
    for (task_id, count) in duplicates {
        result.errors.push(CheckError::DuplicateId {
            task_id: task_id.to_string(),
            count,
        });
    }

    result.valid = result.errors.is_empty();
    result
}

fn check_siblings<'a>(
    tasks: &'a [TaskDoc],
    parent_id: &str,
    seen: &mut HashMap<&'a str, usize>,
    result: &mut CheckResult,
) {
    let mut by_index: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for task in tasks {
        *seen.entry(task.id.as_str()).or_insert(0) += 1;
        if task.parent_id != parent_id {
            result.errors.push(CheckError::ParentMismatch {
                task_id: task.id.clone(),
                declared: task.parent_id.clone(),
                actual: parent_id.to_string(),
            });
        }
        by_index.entry(task.index).or_default().push(task.id.clone());
        check_siblings(&task.subtasks, &task.id, seen, result);
    }

    let mut expected = 0;
    for (index, task_ids) in by_index {
        if index != expected {
            result.warnings.push(CheckWarning::IndexGap {
                parent_id: parent_id.to_string(),
                expected,
                found: index,
            });
        }
        if task_ids.len() > 1 {
            result.warnings.push(CheckWarning::DuplicateIndex {
                parent_id: parent_id.to_string(),
                index,
                task_ids,
            });
        }
        expected = index + 1;
    }
}
