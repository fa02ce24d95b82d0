//! Save snapshots - the state a save/load collaborator needs to resume play.
//!
//! A snapshot holds the current node and the set flag ids. Writing it to disk
//! is the collaborator's job; this module only converts to and from JSON.

use dialogue_pool::{FlagId, NodeId};
use serde::{Deserialize, Serialize};

use crate::runner::{GraphRunner, Presenter};
use crate::{DialogueError, Result};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable play-session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSnapshot {
    /// Format version for compatibility checking.
    pub version: u32,

    /// Node active when the snapshot was taken.
    pub node_id: Option<NodeId>,

    /// Set flag ids, ascending.
    #[serde(default)]
    pub flags: Vec<FlagId>,
}

/// How a snapshot is applied to a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreOptions {
    /// Clear every flag before applying the saved ones.
    pub clear_flags: bool,
    /// Jump to the saved node (bypassing its flag requirements).
    pub jump: bool,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            clear_flags: true,
            jump: true,
        }
    }
}

impl SaveSnapshot {
    /// Capture the runner's current node and flags.
    pub fn capture(runner: &GraphRunner) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            node_id: runner.current_node_id(),
            flags: runner.flags().iter_set().collect(),
        }
    }

    /// Apply the snapshot to `runner`.
    ///
    /// Returns true when the saved node was entered. Flags are restored even
    /// if the node no longer exists in the loaded script.
    pub fn restore(
        &self,
        runner: &mut GraphRunner,
        presenter: &mut dyn Presenter,
        options: RestoreOptions,
    ) -> bool {
        if options.clear_flags {
            runner.clear_all_flags();
        }
        for &flag in &self.flags {
            runner.set_flag(flag);
        }

        match self.node_id {
            Some(node_id) if options.jump => {
                let entered = runner.jump_to_node(node_id, presenter);
                if !entered {
                    tracing::warn!(node_id = %node_id, "saved node is missing from the loaded script");
                }
                entered
            }
            _ => false,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a snapshot, rejecting other format versions.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: SaveSnapshot = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(DialogueError::SnapshotVersion {
                expected: SNAPSHOT_VERSION,
                found: snapshot.version,
            });
        }
        Ok(snapshot)
    }
}
