use super::intent::Location;
use super::target::Target;

/// What the pointer is currently over
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Hover {
    None,
    Valid { target: Target, offset: Option<f32> },
    Invalid(Target),
}

/// State of one in-progress drag, from start until drop or cancel
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub(super) source_id: String,
    pub(super) origin: Location,
    pub(super) hover: Hover,
    /// Every target that showed the indicator, in first-touched order
    pub(super) touched: Vec<Target>,
}

impl DragSession {
    pub(super) fn new(source_id: &str, origin: Location) -> Self {
        DragSession {
            source_id: source_id.to_string(),
            origin,
            hover: Hover::None,
            touched: Vec::new(),
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Source position captured when the drag started
    pub fn origin(&self) -> &Location {
        &self.origin
    }

    /// The valid target currently recorded, if any
    pub fn hover_id(&self) -> Option<&Target> {
        match &self.hover {
            Hover::Valid { target, .. } => Some(target),
            _ => None,
        }
    }

    pub(super) fn mark(&mut self, target: Target, offset: Option<f32>) {
        if !self.touched.contains(&target) {
            self.touched.push(target.clone());
        }
        self.hover = Hover::Valid { target, offset };
    }

    /// Whether `target` is the current hover, valid or not
    pub(super) fn is_hovering(&self, target: &Target) -> bool {
        match &self.hover {
            Hover::Valid { target: t, .. } | Hover::Invalid(t) => t == target,
            Hover::None => false,
        }
    }
}
