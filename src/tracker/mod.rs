//! Drag-and-drop reorder tracking.
//!
//! A [`DragTracker`] consumes the gesture stream of one drag at a time
//! (start, over/leave, drop or cancel) against a read-only [`TreeIndex`] and
//! yields at most one [`MoveIntent`] per drag. Out-of-order or duplicate
//! gestures degrade to no-ops.

mod index;
mod intent;
mod session;
mod target;

pub use index::TreeIndex;
pub use intent::{Location, MoveIntent};
pub use session::DragSession;
pub use target::{DropPolicy, Placement, Target, TrackerOptions};

use session::Hover;
use tracing::{debug, trace};

/// Observable tracker state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Dragging,
    HoveringValidTarget,
    HoveringInvalidTarget,
}

#[derive(Debug, Default)]
pub struct DragTracker {
    options: TrackerOptions,
    session: Option<DragSession>,
    /// Targets that carried the indicator during the last finished session
    touched: Vec<Target>,
}

impl DragTracker {
    pub fn new(options: TrackerOptions) -> Self {
        DragTracker {
            options,
            ..Default::default()
        }
    }

    pub fn state(&self) -> TrackerState {
        match &self.session {
            None => TrackerState::Idle,
            Some(session) => match session.hover {
                Hover::None => TrackerState::Dragging,
                Hover::Valid { .. } => TrackerState::HoveringValidTarget,
                Hover::Invalid(_) => TrackerState::HoveringInvalidTarget,
            },
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The target currently showing the "drop here" indicator.
    pub fn indicator(&self) -> Option<&Target> {
        self.session.as_ref().and_then(DragSession::hover_id)
    }

    /// Drain the targets that showed an indicator during the last finished
    /// session, so the host can clear every one of them.
    pub fn take_touched(&mut self) -> Vec<Target> {
        std::mem::take(&mut self.touched)
    }

    /// Begin dragging `source_id`. Returns false (and changes nothing) if a
    /// drag is already active or the source is not in the tree.
    pub fn start<T: TreeIndex + ?Sized>(&mut self, tree: &T, source_id: &str) -> bool {
        if let Some(session) = &self.session {
            trace!(
                active = session.source_id(),
                ignored = source_id,
                "drag already in progress"
            );
            return false;
        }
        let (Some(parent), Some(index)) = (tree.parent_of(source_id), tree.index_of(source_id))
        else {
            trace!(source = source_id, "drag start on untracked item");
            return false;
        };
        let origin = Location {
            parent_id: parent.map(str::to_string),
            index,
        };
        self.touched.clear();
        self.session = Some(DragSession::new(source_id, origin));
        debug!(source = source_id, "drag started");
        true
    }

    /// Pointer over `target` with no position information. Returns whether
    /// it is a valid drop target.
    pub fn hover<T: TreeIndex + ?Sized>(&mut self, tree: &T, target: impl Into<Target>) -> bool {
        self.update_hover(tree, target.into(), None)
    }

    /// Pointer over `target` at `offset` (0.0 = leading edge, 1.0 = trailing
    /// edge of the target).
    pub fn hover_at<T: TreeIndex + ?Sized>(
        &mut self,
        tree: &T,
        target: impl Into<Target>,
        offset: f32,
    ) -> bool {
        self.update_hover(tree, target.into(), Some(offset))
    }

    fn update_hover<T: TreeIndex + ?Sized>(
        &mut self,
        tree: &T,
        target: Target,
        offset: Option<f32>,
    ) -> bool {
        let Some(session) = self.session.as_mut() else {
            trace!(%target, "hover without an active drag");
            return false;
        };
        if target.anchor().is_some_and(|id| !tree.contains(id)) {
            trace!(%target, "hover on untracked target");
            session.hover = Hover::None;
            return false;
        }
        if is_valid_target(tree, &session.source_id, &target) {
            debug!(%target, "hovering valid target");
            session.mark(target, offset);
            true
        } else {
            debug!(%target, "hovering invalid target");
            session.hover = Hover::Invalid(target);
            false
        }
    }

    /// Pointer left `target`. Clears the hover only if `target` is the one
    /// currently hovered.
    pub fn leave(&mut self, target: impl Into<Target>) {
        let target = target.into();
        if let Some(session) = self.session.as_mut() {
            if session.is_hovering(&target) {
                debug!(%target, "left target");
                session.hover = Hover::None;
            }
        }
    }

    /// Finish the drag by dropping on `target`, using the pointer offset
    /// recorded by the last hover over the same target.
    pub fn drop<T: TreeIndex + ?Sized>(
        &mut self,
        tree: &T,
        target: impl Into<Target>,
    ) -> Option<MoveIntent> {
        self.finish(tree, target.into(), None)
    }

    /// Finish the drag by dropping on `target` at `offset`.
    pub fn drop_at<T: TreeIndex + ?Sized>(
        &mut self,
        tree: &T,
        target: impl Into<Target>,
        offset: f32,
    ) -> Option<MoveIntent> {
        self.finish(tree, target.into(), Some(offset))
    }

    /// Abort the drag without emitting anything. Safe to call when idle.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(source = session.source_id(), "drag cancelled");
            self.touched = session.touched;
        }
    }

    fn finish<T: TreeIndex + ?Sized>(
        &mut self,
        tree: &T,
        target: Target,
        offset: Option<f32>,
    ) -> Option<MoveIntent> {
        let Some(session) = self.session.take() else {
            trace!(%target, "drop without an active drag");
            return None;
        };
        let DragSession {
            source_id,
            origin,
            hover,
            touched,
        } = session;
        self.touched = touched;

        let Hover::Valid {
            target: hovered,
            offset: hover_offset,
        } = hover
        else {
            debug!(%target, "drop without a valid target");
            return None;
        };
        if !tree.contains(&source_id) || !is_valid_target(tree, &source_id, &target) {
            debug!(%target, "drop target rejected");
            return None;
        }
        let offset = offset.or(if hovered == target { hover_offset } else { None });
        let intent = resolve_move(tree, &self.options, &source_id, origin, &target, offset)?;
        if intent.is_noop() {
            debug!(%intent, "drop left item in place");
            return None;
        }
        debug!(%intent, "move emitted");
        Some(intent)
    }
}

/// A target is invalid when it is the source itself, lies inside the
/// source's subtree, or is not in the tree. The root list is always valid.
pub fn is_valid_target<T: TreeIndex + ?Sized>(tree: &T, source_id: &str, target: &Target) -> bool {
    match target.anchor() {
        None => true,
        Some(id) => id != source_id && tree.contains(id) && !tree.is_descendant(id, source_id),
    }
}

fn resolve_move<T: TreeIndex + ?Sized>(
    tree: &T,
    options: &TrackerOptions,
    source_id: &str,
    origin: Location,
    target: &Target,
    offset: Option<f32>,
) -> Option<MoveIntent> {
    let (new_parent_id, slot) = match target {
        Target::Item(id) => {
            let parent = tree.parent_of(id)?;
            let index = tree.index_of(id)?;
            let slot = match options.placement(offset) {
                Placement::Before => index,
                Placement::After => index + 1,
            };
            (parent.map(str::to_string), slot)
        }
        Target::Container(parent) => (parent.clone(), tree.children_of(parent.as_deref()).len()),
    };

    // The slot was counted with the source still in place.
    let new_index = match (tree.parent_of(source_id), tree.index_of(source_id)) {
        (Some(current_parent), Some(current))
            if current_parent == new_parent_id.as_deref() && current < slot =>
        {
            slot - 1
        }
        _ => slot,
    };

    Some(MoveIntent {
        item_id: source_id.to_string(),
        old_parent_id: origin.parent_id,
        new_parent_id,
        old_index: origin.index,
        new_index,
    })
}
