//! Pool Store - the arena holding every node, choice and flag reference.

use std::collections::HashMap;

use super::{Choice, Node, NodeDraft, NodeId, Span};
use crate::{FlagId, PoolError, PoolKind, PoolLimits};

/// Fixed-capacity struct-of-arrays for a compiled script.
///
/// A node's slot is assigned on its first declaration (authored row or
/// placeholder) and never moves; choice runs and the id index rely on that.
/// The store is only mutated while compiling and is reset wholesale on reload.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolStore {
    limits: PoolLimits,

    nodes: Vec<Node>,
    choices: Vec<Choice>,
    flag_refs: Vec<FlagId>,

    /// Index: node id -> slot in `nodes`.
    index_by_id: HashMap<NodeId, usize>,
}

impl PoolStore {
    /// Create an empty store bounded by `limits`, capped so every offset
    /// fits a `u32` span.
    pub fn new(limits: PoolLimits) -> Self {
        Self {
            limits: limits.addressable(),
            nodes: Vec::new(),
            choices: Vec::new(),
            flag_refs: Vec::new(),
            index_by_id: HashMap::new(),
        }
    }

    /// Create an empty store with the default limits.
    pub fn with_defaults() -> Self {
        Self::new(PoolLimits::default())
    }

    pub fn limits(&self) -> PoolLimits {
        self.limits
    }

    /// Drop every record but keep the allocations for the next compile.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.choices.clear();
        self.flag_refs.clear();
        self.index_by_id.clear();
    }

    fn ensure_capacity(kind: PoolKind, len: usize, extra: usize, limit: usize) -> Result<(), PoolError> {
        if len + extra > limit {
            return Err(PoolError::CapacityExceeded { pool: kind, limit });
        }
        Ok(())
    }

    fn allocate(&mut self, node: Node) -> Result<usize, PoolError> {
        Self::ensure_capacity(PoolKind::Nodes, self.nodes.len(), 1, self.limits.max_nodes)?;
        let slot = self.nodes.len();
        self.index_by_id.insert(node.id, slot);
        self.nodes.push(node);
        Ok(slot)
    }

    /// Insert a node or patch the existing one in place.
    ///
    /// Returns the slot and whether a new slot was allocated.
    pub fn upsert_node(&mut self, id: NodeId, draft: NodeDraft) -> Result<(usize, bool), PoolError> {
        if let Some(&slot) = self.index_by_id.get(&id) {
            self.nodes[slot].apply(draft);
            return Ok((slot, false));
        }

        let mut node = Node::placeholder(id);
        node.apply(draft);
        let slot = self.allocate(node)?;
        Ok((slot, true))
    }

    /// Slot for `id`, materializing an empty placeholder node when absent.
    pub fn ensure_node(&mut self, id: NodeId) -> Result<usize, PoolError> {
        match self.index_by_id.get(&id) {
            Some(&slot) => Ok(slot),
            None => {
                tracing::debug!(node_id = %id, "materializing placeholder node");
                self.allocate(Node::placeholder(id))
            }
        }
    }

    /// Append flag ids to the flag-reference pool and return their span.
    pub fn push_flags(&mut self, ids: &[FlagId]) -> Result<Span, PoolError> {
        if ids.is_empty() {
            return Ok(Span::new(self.flag_refs.len() as u32, 0));
        }
        Self::ensure_capacity(
            PoolKind::FlagRefs,
            self.flag_refs.len(),
            ids.len(),
            self.limits.max_flag_refs,
        )?;
        let offset = self.flag_refs.len() as u32;
        self.flag_refs.extend_from_slice(ids);
        Ok(Span::new(offset, ids.len() as u32))
    }

    /// Append a choice to the node in `parent_slot`.
    ///
    /// The parent's choice offset is fixed by its first choice; later choices
    /// for the same parent must follow directly to stay contiguous.
    pub fn attach_choice(&mut self, parent_slot: usize, choice: Choice) -> Result<(), PoolError> {
        Self::ensure_capacity(PoolKind::Choices, self.choices.len(), 1, self.limits.max_choices)?;
        let position = self.choices.len() as u32;

        let Some(parent) = self.nodes.get_mut(parent_slot) else {
            return Ok(());
        };

        if parent.choices.is_empty() {
            parent.choices.offset = position;
        } else if parent.choices.end() != position as usize {
            tracing::warn!(
                node_id = %parent.id,
                offset = parent.choices.offset,
                position,
                "choice run is not contiguous; choices for one node must be listed together"
            );
        }
        parent.choices.count += 1;

        self.choices.push(choice);
        Ok(())
    }

    /// Look up a node and its slot.
    pub fn try_get_node_by_id(&self, id: NodeId) -> Option<(&Node, usize)> {
        let slot = *self.index_by_id.get(&id)?;
        self.nodes.get(slot).map(|node| (node, slot))
    }

    pub fn slot_of(&self, id: NodeId) -> Option<usize> {
        self.index_by_id.get(&id).copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index_by_id.contains_key(&id)
    }

    pub fn node(&self, slot: usize) -> Option<&Node> {
        self.nodes.get(slot)
    }

    /// All nodes in slot order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The whole choice pool.
    pub fn choice_pool(&self) -> &[Choice] {
        &self.choices
    }

    /// The whole flag-reference pool.
    pub fn flag_refs(&self) -> &[FlagId] {
        &self.flag_refs
    }

    /// Choices of a node, empty when it has none.
    pub fn choices_of(&self, node: &Node) -> &[Choice] {
        node.choices.slice(&self.choices)
    }

    pub fn flags(&self, span: Span) -> &[FlagId] {
        span.slice(&self.flag_refs)
    }

    /// Flags a node requires for entry.
    pub fn required_flags(&self, node: &Node) -> &[FlagId] {
        self.flags(node.flags_req)
    }

    /// Flags a node sets on entry.
    pub fn effect_flags(&self, node: &Node) -> &[FlagId] {
        self.flags(node.flags_set)
    }

    /// Flags a choice sets when taken.
    pub fn choice_flags(&self, choice: &Choice) -> &[FlagId] {
        self.flags(choice.set_flags)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }

    pub fn flag_ref_count(&self) -> usize {
        self.flag_refs.len()
    }
}

impl Default for PoolStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}
