use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a gesture is over: an item, or a child list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Target {
    /// A sibling item; the drop lands before or after it
    Item(String),
    /// The child list owned by an item (`None` for the root list); the drop
    /// appends to it
    Container(Option<String>),
}

impl Target {
    pub fn item(id: impl Into<String>) -> Self {
        Target::Item(id.into())
    }

    pub fn container(id: impl Into<String>) -> Self {
        Target::Container(Some(id.into()))
    }

    pub fn root() -> Self {
        Target::Container(None)
    }

    /// The item whose ancestry decides validity; `None` for the root list.
    pub fn anchor(&self) -> Option<&str> {
        match self {
            Target::Item(id) => Some(id),
            Target::Container(id) => id.as_deref(),
        }
    }
}

impl From<&str> for Target {
    fn from(id: &str) -> Self {
        Target::Item(id.to_string())
    }
}

impl From<String> for Target {
    fn from(id: String) -> Self {
        Target::Item(id)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Item(id) => write!(f, "{}", id),
            Target::Container(None) => write!(f, "@root"),
            Target::Container(Some(id)) => write!(f, "@{}", id),
        }
    }
}

/// How a drop onto an item picks between "before" and "after"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPolicy {
    /// Compare the pointer offset against the threshold
    #[default]
    Midpoint,
    /// Always insert before the target
    Before,
}

impl fmt::Display for DropPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropPolicy::Midpoint => write!(f, "midpoint"),
            DropPolicy::Before => write!(f, "before"),
        }
    }
}

impl FromStr for DropPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "midpoint" => Ok(DropPolicy::Midpoint),
            "before" => Ok(DropPolicy::Before),
            other => Err(format!(
                "unknown drop policy '{}' (expected midpoint or before)",
                other
            )),
        }
    }
}

/// Side of a target item a drop lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerOptions {
    pub policy: DropPolicy,
    /// Offset (0.0 = leading edge, 1.0 = trailing edge) past which a
    /// midpoint drop lands after the target
    pub threshold: f32,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        TrackerOptions {
            policy: DropPolicy::Midpoint,
            threshold: 0.5,
        }
    }
}

impl TrackerOptions {
    /// Resolve a drop onto an item. Without a usable pointer offset the drop
    /// lands after the target.
    pub fn placement(&self, offset: Option<f32>) -> Placement {
        match self.policy {
            DropPolicy::Before => Placement::Before,
            DropPolicy::Midpoint => match offset.filter(|o| !o.is_nan()) {
                Some(o) if o <= self.threshold => Placement::Before,
                _ => Placement::After,
            },
        }
    }
}
