//! Choice definitions.

use serde::{Deserialize, Serialize};

use super::{NodeId, Span};

/// A player-selectable branch attached to exactly one parent node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Display text.
    pub label: String,

    /// Node entered when the choice is taken. `None` keeps the runner on the
    /// current choice list.
    pub goto: Option<NodeId>,

    /// Flags set when chosen, as a span of the flag-reference pool.
    pub set_flags: Span,
}

impl Choice {
    pub fn new(label: impl Into<String>, goto: Option<NodeId>, set_flags: Span) -> Self {
        Self {
            label: label.into(),
            goto,
            set_flags,
        }
    }
}
