use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tracker::MoveIntent;

/// Persisted session state (written to the configured state file)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Tree file used when a command names none
    #[serde(default)]
    pub last_tree: Option<PathBuf>,
    /// Applied moves, oldest first
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub tree: PathBuf,
    pub intent: MoveIntent,
    pub applied_at: DateTime<Utc>,
}

impl SessionState {
    /// Record an applied move, dropping the oldest entries beyond `limit`.
    pub fn record(&mut self, tree: &Path, intent: MoveIntent, limit: usize) {
        self.history.push(HistoryEntry {
            tree: tree.to_path_buf(),
            intent,
            applied_at: Utc::now(),
        });
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
    }

    /// Remove and return the most recent move applied to `tree`.
    pub fn pop_for(&mut self, tree: &Path) -> Option<HistoryEntry> {
        let idx = self.history.iter().rposition(|e| e.tree == tree)?;
        Some(self.history.remove(idx))
    }
}

/// Read session state. Missing or unreadable state is treated as absent.
pub fn read_state(path: &Path) -> Option<SessionState> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed session state");
            None
        }
    }
}

/// Write session state.
pub fn write_state(path: &Path, state: &SessionState) -> Result<(), std::io::Error> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(path, content)
}
