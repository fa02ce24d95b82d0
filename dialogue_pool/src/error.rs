//! Error types for the pool data model.

use thiserror::Error;

/// Which fixed-capacity pool an operation ran out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    Nodes,
    Choices,
    FlagRefs,
}

impl std::fmt::Display for PoolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PoolKind::Nodes => "node",
            PoolKind::Choices => "choice",
            PoolKind::FlagRefs => "flag reference",
        };
        f.write_str(name)
    }
}

/// Errors raised while building or configuring a pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// A pool is full. The script is larger than the configured story bounds.
    #[error("{pool} pool exceeded its capacity of {limit}")]
    CapacityExceeded { pool: PoolKind, limit: usize },

    #[error("invalid pool configuration: {0}")]
    Config(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message() {
        let err = PoolError::CapacityExceeded {
            pool: PoolKind::Choices,
            limit: 3,
        };
        assert_eq!(err.to_string(), "choice pool exceeded its capacity of 3");
    }
}
