//! Capacity ceilings for the pools.

use serde::{Deserialize, Serialize};

use crate::PoolError;

/// Maximum sizes of the node, choice and flag-reference pools.
///
/// Exceeding any of them while compiling is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolLimits {
    pub max_nodes: usize,
    pub max_choices: usize,
    pub max_flag_refs: usize,
}

impl PoolLimits {
    pub const DEFAULT_MAX_NODES: usize = 100_000;
    pub const DEFAULT_MAX_CHOICES: usize = 300_000;
    pub const DEFAULT_MAX_FLAG_REFS: usize = 1_000_000;

    /// Create limits with explicit ceilings.
    pub fn new(max_nodes: usize, max_choices: usize, max_flag_refs: usize) -> Self {
        Self {
            max_nodes,
            max_choices,
            max_flag_refs,
        }
    }

    /// Cap every ceiling at what a `u32` span offset can address.
    pub fn addressable(self) -> Self {
        let cap = |limit: usize| limit.min(u32::MAX as usize);
        Self {
            max_nodes: cap(self.max_nodes),
            max_choices: cap(self.max_choices),
            max_flag_refs: cap(self.max_flag_refs),
        }
    }

    /// Parse limits from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, PoolError> {
        Ok(toml::from_str(source)?)
    }
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self {
            max_nodes: Self::DEFAULT_MAX_NODES,
            max_choices: Self::DEFAULT_MAX_CHOICES,
            max_flag_refs: Self::DEFAULT_MAX_FLAG_REFS,
        }
    }
}
