//! The pooled dialogue graph: nodes, choices and the shared flag-reference array.
//!
//! Every variable-length list (a node's choices, its required and effect flags,
//! a choice's effect flags) is a [`Span`] into one flat backing array, so the
//! whole graph is a handful of contiguous allocations.

mod choice;
mod node;
mod store;

pub use choice::*;
pub use node::*;
pub use store::*;

use serde::{Deserialize, Serialize};

/// Author-assigned node identifier, stable across reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An `(offset, count)` slice into one of the pool's backing arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Span {
    pub offset: u32,
    pub count: u32,
}

impl Span {
    pub const EMPTY: Span = Span { offset: 0, count: 0 };

    pub fn new(offset: u32, count: u32) -> Self {
        Self { offset, count }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// One past the last element covered.
    pub fn end(&self) -> usize {
        self.offset as usize + self.count as usize
    }

    /// Resolve against a backing array. Out-of-bounds spans yield an empty slice.
    pub fn slice<'a, T>(&self, backing: &'a [T]) -> &'a [T] {
        backing.get(self.offset as usize..self.end()).unwrap_or(&[])
    }
}
