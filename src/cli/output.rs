use serde::Serialize;

use crate::model::project::Project;
use crate::ops::check::{CheckError, CheckResult, CheckWarning};
use crate::ops::reorder_ops::OrderUpdate;
use crate::ops::replay::{Outcome, ReplayStep};
use crate::tracker::MoveIntent;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct MoveJson<'a> {
    /// `None` when the drop left the item where it was
    pub intent: Option<&'a MoveIntent>,
    pub applied: bool,
    pub updates: &'a [OrderUpdate],
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Format a project as an indented outline, one item per line.
pub fn format_outline(project: &Project) -> Vec<String> {
    let mut lines = vec![format!("== {} ({}) ==", project.name, project.id)];
    for (depth, item) in project.tree.depth_first() {
        let mark = if item.done { 'x' } else { ' ' };
        lines.push(format!(
            "{}[{}] {} {}",
            "  ".repeat(depth),
            mark,
            item.id,
            item.title
        ));
    }
    lines
}

pub fn format_update(update: &OrderUpdate) -> String {
    format!(
        "  {} -> {}[{}]",
        update.id,
        update.parent_id.as_deref().unwrap_or("root"),
        update.index
    )
}

pub fn format_step(step: &ReplayStep) -> String {
    let outcome = match &step.outcome {
        Outcome::Started => "started".to_string(),
        Outcome::Ignored => "ignored".to_string(),
        Outcome::Valid => "valid target".to_string(),
        Outcome::Invalid => "invalid target".to_string(),
        Outcome::Left => "left".to_string(),
        Outcome::NoMove => "no move".to_string(),
        Outcome::Cancelled => "cancelled".to_string(),
        Outcome::Moved { intent, applied, .. } => {
            if *applied {
                format!("moved {}", intent)
            } else {
                format!("would move {}", intent)
            }
        }
    };
    format!("{:<24} {}", step.gesture.to_string(), outcome)
}

pub fn format_check(result: &CheckResult) -> Vec<String> {
    let mut lines = Vec::new();
    if !result.errors.is_empty() {
        lines.push("Errors:".to_string());
        for err in &result.errors {
            lines.push(match err {
                CheckError::DuplicateId { task_id, count } => {
                    format!("  {} appears {} times", task_id, count)
                }
                CheckError::ParentMismatch {
                    task_id,
                    declared,
                    actual,
                } => format!(
                    "  {} declares parent {} but is nested under {}",
                    task_id, declared, actual
                ),
            });
        }
    }
    if !result.warnings.is_empty() {
        if !result.errors.is_empty() {
            lines.push(String::new());
        }
        lines.push("Warnings:".to_string());
        for warn in &result.warnings {
            lines.push(match warn {
                CheckWarning::DuplicateIndex {
                    parent_id,
                    index,
                    task_ids,
                } => format!(
                    "  [{}] index {} shared by {}",
                    parent_id,
                    index,
                    task_ids.join(", ")
                ),
                CheckWarning::IndexGap {
                    parent_id,
                    expected,
                    found,
                } => format!(
                    "  [{}] index jumps from {} to {}",
                    parent_id, expected, found
                ),
            });
        }
    }
    if result.valid {
        lines.push("✓ tree is valid".to_string());
    } else {
        lines.push("✗ tree has errors".to_string());
    }
    lines
}
