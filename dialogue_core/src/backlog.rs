//! Backlog - a bounded history of entered lines for a log viewer.

use std::collections::VecDeque;

use dialogue_pool::{Choice, FlagStore, Node, NodeId, PoolStore};
use serde::{Deserialize, Serialize};

use crate::runner::Presenter;

/// One entered line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogEntry {
    pub node_id: NodeId,
    pub speaker: String,
    pub text: String,
}

/// Ring buffer of the most recent entries; the oldest is dropped when full.
#[derive(Debug, Clone)]
pub struct Backlog {
    entries: VecDeque<BacklogEntry>,
    capacity: usize,
}

impl Backlog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn from_config(config: &crate::EngineConfig) -> Self {
        Self::new(config.backlog_capacity)
    }

    pub fn record(&mut self, node: &Node) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(BacklogEntry {
            node_id: node.id,
            speaker: node.speaker.clone(),
            text: node.text.clone(),
        });
    }

    /// Up to `count` most recent entries, oldest first.
    pub fn latest(&self, count: usize) -> impl Iterator<Item = &BacklogEntry> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for Backlog {
    fn default() -> Self {
        Self::new(crate::EngineConfig::DEFAULT_BACKLOG_CAPACITY)
    }
}

impl Presenter for Backlog {
    fn on_node_entered(&mut self, node: &Node, _pool: &PoolStore, _flags: &FlagStore) {
        self.record(node);
    }

    fn on_choices_ready(&mut self, _choices: &[Choice]) {}
}
