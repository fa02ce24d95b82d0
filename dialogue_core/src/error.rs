//! Error types for the dialogue engine.
//!
//! Only fatal conditions are errors. Malformed fields degrade to defaults, and
//! gate failures or dangling references show up as runner outcomes instead.

use dialogue_pool::PoolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DialogueError {
    /// The script has no header line.
    #[error("script is empty")]
    EmptyScript,

    /// A pool filled up while compiling the given 1-based line.
    #[error("line {line}: {source}")]
    Compile {
        line: usize,
        #[source]
        source: PoolError,
    },

    /// A node or choice row names an id that cannot address a node.
    #[error("line {line}: node id out of range: {text:?}")]
    InvalidNodeId { line: usize, text: String },

    /// Too many pending entries; usually a goto cycle with no flag exit.
    #[error("pending-entry stack overflow (capacity {capacity})")]
    PendingOverflow { capacity: usize },

    #[error("snapshot JSON error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("snapshot version mismatch: expected {expected}, found {found}")]
    SnapshotVersion { expected: u32, found: u32 },

    #[error("invalid engine configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DialogueError>;
