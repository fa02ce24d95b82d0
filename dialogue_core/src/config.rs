//! Engine configuration.

use dialogue_pool::{NodeId, PoolLimits};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Tunables for compiling and running a script.
///
/// ```toml
/// start_node = 100
/// pending_capacity = 1024
///
/// [limits]
/// max_nodes = 5000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub limits: PoolLimits,

    /// Maximum depth of the runner's pending-entry stack.
    pub pending_capacity: usize,

    /// Number of entered lines the backlog keeps.
    pub backlog_capacity: usize,

    /// Node entered by a new game.
    pub start_node: NodeId,
}

impl EngineConfig {
    pub const DEFAULT_PENDING_CAPACITY: usize = 1024;
    pub const DEFAULT_BACKLOG_CAPACITY: usize = 256;

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            limits: PoolLimits::default(),
            pending_capacity: Self::DEFAULT_PENDING_CAPACITY,
            backlog_capacity: Self::DEFAULT_BACKLOG_CAPACITY,
            start_node: NodeId(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DialogueError;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.pending_capacity, 1024);
        assert_eq!(config.backlog_capacity, 256);
        assert_eq!(config.start_node, NodeId(0));
        assert_eq!(config.limits, PoolLimits::default());
    }

    #[test]
    fn test_from_toml() {
        let config = EngineConfig::from_toml_str(
            "start_node = 100\npending_capacity = 16\n\n[limits]\nmax_nodes = 5000\n",
        )
        .unwrap();

        assert_eq!(config.start_node, NodeId(100));
        assert_eq!(config.pending_capacity, 16);
        assert_eq!(config.backlog_capacity, 256);
        assert_eq!(config.limits.max_nodes, 5000);
        assert_eq!(config.limits.max_choices, PoolLimits::DEFAULT_MAX_CHOICES);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = EngineConfig::from_toml_str("start_node = -4").unwrap_err();
        assert!(matches!(err, DialogueError::Config(_)));
    }
}
