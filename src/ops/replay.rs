use serde::Serialize;

use super::reorder_ops::{self, MoveError, OrderUpdate};
use crate::model::tree::ItemTree;
use crate::parse::Gesture;
use crate::tracker::{DragTracker, MoveIntent};

/// What a single gesture did to the tracker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// A drag began
    Started,
    /// The gesture had no effect (no drag active, drag already active, or
    /// unknown item)
    Ignored,
    /// Pointer is over a valid drop target
    Valid,
    /// Pointer is over a target the item cannot be dropped on
    Invalid,
    /// Pointer left a target
    Left,
    /// The drag ended without a move
    NoMove,
    /// The drag was aborted
    Cancelled,
    /// The drag produced a move
    Moved {
        intent: MoveIntent,
        applied: bool,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        updates: Vec<OrderUpdate>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayStep {
    pub gesture: Gesture,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ReplayStep {
    pub fn intent(&self) -> Option<&MoveIntent> {
        match &self.outcome {
            Outcome::Moved { intent, .. } => Some(intent),
            _ => None,
        }
    }
}

/// Feed `gestures` through `tracker` against `tree`. With `apply`, every
/// emitted move is applied to the tree before the next gesture is read, so
/// later drags see the updated order.
pub fn replay(
    tracker: &mut DragTracker,
    tree: &mut ItemTree,
    gestures: &[Gesture],
    apply: bool,
) -> Result<Vec<ReplayStep>, MoveError> {
    let mut steps = Vec::with_capacity(gestures.len());
    for gesture in gestures {
        let active = tracker.is_active();
        let outcome = match gesture {
            Gesture::Start { item } => {
                if tracker.start(&*tree, item) {
                    Outcome::Started
                } else {
                    Outcome::Ignored
                }
            }
            Gesture::Over { target, offset } => {
                let valid = match offset {
                    Some(o) => tracker.hover_at(&*tree, target.clone(), *o),
                    None => tracker.hover(&*tree, target.clone()),
                };
                match (active, valid) {
                    (false, _) => Outcome::Ignored,
                    (true, true) => Outcome::Valid,
                    (true, false) => Outcome::Invalid,
                }
            }
            Gesture::Leave { target } => {
                tracker.leave(target.clone());
                if active { Outcome::Left } else { Outcome::Ignored }
            }
            Gesture::Drop { target, offset } => {
                let intent = match offset {
                    Some(o) => tracker.drop_at(&*tree, target.clone(), *o),
                    None => tracker.drop(&*tree, target.clone()),
                };
                match (active, intent) {
                    (false, _) => Outcome::Ignored,
                    (true, None) => Outcome::NoMove,
                    (true, Some(intent)) => {
                        let updates = if apply {
                            reorder_ops::apply_move(tree, &intent)?
                        } else {
                            Vec::new()
                        };
                        Outcome::Moved {
                            intent,
                            applied: apply,
                            updates,
                        }
                    }
                }
            }
            Gesture::Cancel => {
                tracker.cancel();
                if active { Outcome::Cancelled } else { Outcome::Ignored }
            }
        };
        steps.push(ReplayStep {
            gesture: gesture.clone(),
            outcome,
        });
    }
    Ok(steps)
}
