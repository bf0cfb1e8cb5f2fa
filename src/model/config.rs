use serde::{Deserialize, Serialize};

use crate::tracker::{DropPolicy, TrackerOptions};

/// Configuration from reorder.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub drop: DropConfig,
    #[serde(default)]
    pub state: StateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropConfig {
    #[serde(default)]
    pub policy: DropPolicy,
    /// Fraction of a target's extent past which a drop lands after it
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

impl Default for DropConfig {
    fn default() -> Self {
        DropConfig {
            policy: DropPolicy::default(),
            threshold: default_threshold(),
        }
    }
}

impl DropConfig {
    /// Whether `threshold` is a usable fraction of a target's extent
    pub fn threshold_in_range(threshold: f32) -> bool {
        (0.0..=1.0).contains(&threshold)
    }

    pub fn tracker_options(&self) -> TrackerOptions {
        TrackerOptions {
            policy: self.policy,
            threshold: self.threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateConfig {
    /// Session state file, relative to the config directory
    #[serde(default = "default_state_file")]
    pub file: String,
    /// Maximum number of applied moves kept for `undo`
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for StateConfig {
    fn default() -> Self {
        StateConfig {
            file: default_state_file(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_threshold() -> f32 {
    0.5
}

fn default_state_file() -> String {
    ".reorder-state.json".to_string()
}

fn default_history_limit() -> usize {
    50
}
