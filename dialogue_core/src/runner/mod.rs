//! Graph Runner - walks a compiled script under flag-gated preconditions.
//!
//! The runner holds a pending-entry stack, the active node and the flag store.
//! Entering a node first checks its required flags; a failed check is not an
//! error but the branching primitive itself: the entry is abandoned and the
//! next pending id (if any) is tried instead.
//!
//! ## States
//!
//! - **Idle**: no active node
//! - **NodeActive**: a node has been entered and handed to the presenter
//! - **AwaitingChoice**: the active node's choices were offered; `choose` resolves them

mod presenter;

pub use presenter::*;

use dialogue_pool::{FlagId, FlagStore, Node, NodeId, PoolStore};

use crate::{DialogueError, EngineConfig, Result};

/// Observable runner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    NodeActive,
    AwaitingChoice,
}

/// What a call to `step`, `start` or `choose` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The advance gate reported busy; nothing happened.
    Busy,
    /// A node was entered and delivered to the presenter.
    Entered(NodeId),
    /// The active node's choices were delivered to the presenter.
    ChoicesPresented,
    /// A choice without a target was taken; its flags were applied and the
    /// runner is still waiting for a choice.
    AwaitingChoice,
    /// The active node had no choices and no successor.
    Ended,
    /// Every entry attempt failed (gate blocked or unknown id). The runner
    /// is now idle and the presenter was not called.
    Stalled,
    /// Nothing to do: no pending entries and no active node.
    Idle,
    /// The call was not valid in the current state.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Idle,
    Active(usize),
    AwaitingChoice(usize),
}

impl Cursor {
    fn slot(self) -> Option<usize> {
        match self {
            Cursor::Idle => None,
            Cursor::Active(slot) | Cursor::AwaitingChoice(slot) => Some(slot),
        }
    }
}

/// The dialogue interpreter for one play session.
pub struct GraphRunner {
    pool: PoolStore,
    flags: FlagStore,

    pending: Vec<NodeId>,
    pending_capacity: usize,

    cursor: Cursor,
    gate: Box<dyn AdvanceGate>,

    /// Node entered by `new_game`.
    start_node: NodeId,
}

impl GraphRunner {
    /// Create a runner over a compiled pool with default settings.
    pub fn new(pool: PoolStore) -> Self {
        Self::with_pending_capacity(pool, EngineConfig::DEFAULT_PENDING_CAPACITY)
    }

    /// Create a runner with a custom pending-stack capacity.
    pub fn with_pending_capacity(pool: PoolStore, pending_capacity: usize) -> Self {
        Self {
            pool,
            flags: FlagStore::new(),
            pending: Vec::with_capacity(pending_capacity),
            pending_capacity,
            cursor: Cursor::Idle,
            gate: Box::new(OpenGate),
            start_node: NodeId(0),
        }
    }

    /// Create a runner using the configured pending capacity and start node.
    pub fn from_config(pool: PoolStore, config: &EngineConfig) -> Self {
        let mut runner = Self::with_pending_capacity(pool, config.pending_capacity);
        runner.start_node = config.start_node;
        runner
    }

    pub fn start_node(&self) -> NodeId {
        self.start_node
    }

    /// Install the external busy signal checked by `step` and `choose`.
    pub fn set_gate(&mut self, gate: Box<dyn AdvanceGate>) {
        self.gate = gate;
    }

    /// Swap in a recompiled pool. The cursor and pending entries refer to the
    /// old pool and are dropped; flags are kept.
    pub fn load_pool(&mut self, pool: PoolStore) -> PoolStore {
        self.pending.clear();
        self.cursor = Cursor::Idle;
        std::mem::replace(&mut self.pool, pool)
    }

    pub fn pool(&self) -> &PoolStore {
        &self.pool
    }

    pub fn flags(&self) -> &FlagStore {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut FlagStore {
        &mut self.flags
    }

    pub fn state(&self) -> RunnerState {
        match self.cursor {
            Cursor::Idle => RunnerState::Idle,
            Cursor::Active(_) => RunnerState::NodeActive,
            Cursor::AwaitingChoice(_) => RunnerState::AwaitingChoice,
        }
    }

    /// The active node, if any.
    pub fn current_node(&self) -> Option<&Node> {
        self.cursor.slot().and_then(|slot| self.pool.node(slot))
    }

    pub fn current_node_id(&self) -> Option<NodeId> {
        self.current_node().map(|node| node.id)
    }

    /// Number of ids waiting for an entry attempt.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn has_flag(&self, id: FlagId) -> bool {
        self.flags.has(id)
    }

    pub fn set_flag(&mut self, id: FlagId) {
        self.flags.set(id);
    }

    pub fn clear_all_flags(&mut self) {
        self.flags.clear_all();
    }

    fn push(&mut self, id: NodeId) -> Result<()> {
        if self.pending.len() >= self.pending_capacity {
            return Err(DialogueError::PendingOverflow {
                capacity: self.pending_capacity,
            });
        }
        tracing::trace!(node_id = %id, depth = self.pending.len() + 1, "pending push");
        self.pending.push(id);
        Ok(())
    }

    /// Queue `start` and advance.
    pub fn start(&mut self, start: NodeId, presenter: &mut dyn Presenter) -> Result<StepOutcome> {
        self.push(start)?;
        Ok(self.step(presenter))
    }

    /// Clear all flags and pending entries, then start at the start node.
    pub fn new_game(&mut self, presenter: &mut dyn Presenter) -> Result<StepOutcome> {
        self.flags.clear_all();
        self.pending.clear();
        self.cursor = Cursor::Idle;
        self.start(self.start_node, presenter)
    }

    /// Advance the story by one beat.
    ///
    /// Pending entries are tried newest first and the first successful entry
    /// wins. With nothing pending, the active node offers its choices, moves
    /// to its linear successor, or ends.
    pub fn step(&mut self, presenter: &mut dyn Presenter) -> StepOutcome {
        if self.gate.is_busy() {
            return StepOutcome::Busy;
        }

        let mut attempted = false;
        while let Some(id) = self.pending.pop() {
            tracing::trace!(node_id = %id, "pending pop");
            attempted = true;
            if self.enter(id, true, presenter) {
                return StepOutcome::Entered(id);
            }
        }
        if attempted {
            return self.stall();
        }

        let Some(slot) = self.cursor.slot() else {
            return StepOutcome::Idle;
        };
        let Some(node) = self.pool.node(slot) else {
            self.cursor = Cursor::Idle;
            return StepOutcome::Idle;
        };

        if node.has_choices() {
            presenter.on_choices_ready(self.pool.choices_of(node));
            self.cursor = Cursor::AwaitingChoice(slot);
            return StepOutcome::ChoicesPresented;
        }

        let (node_id, next) = (node.id, node.next);
        match next {
            Some(next) => {
                if self.enter(next, true, presenter) {
                    StepOutcome::Entered(next)
                } else {
                    self.stall()
                }
            }
            None => {
                tracing::debug!(node_id = %node_id, "end of content");
                self.cursor = Cursor::Idle;
                presenter.on_content_ended();
                StepOutcome::Ended
            }
        }
    }

    /// Resolve the offered choice at `index`.
    ///
    /// Only valid while awaiting a choice; an out-of-range index is ignored.
    /// The choice's flags are applied, its target is queued and the runner
    /// advances immediately.
    pub fn choose(&mut self, index: usize, presenter: &mut dyn Presenter) -> Result<StepOutcome> {
        if self.gate.is_busy() {
            return Ok(StepOutcome::Busy);
        }
        let Cursor::AwaitingChoice(slot) = self.cursor else {
            return Ok(StepOutcome::Ignored);
        };
        let Some(node) = self.pool.node(slot) else {
            return Ok(StepOutcome::Ignored);
        };
        let Some(choice) = self.pool.choices_of(node).get(index) else {
            return Ok(StepOutcome::Ignored);
        };

        self.flags.set_all(self.pool.choice_flags(choice));
        let goto = choice.goto;

        match goto {
            Some(target) => {
                self.push(target)?;
                Ok(self.step(presenter))
            }
            None => Ok(StepOutcome::AwaitingChoice),
        }
    }

    /// Enter `id` without checking its required flags. Used to restore a
    /// save; pending entries are discarded. Returns false for unknown ids,
    /// leaving the runner untouched.
    pub fn jump_to_node(&mut self, id: NodeId, presenter: &mut dyn Presenter) -> bool {
        if !self.pool.contains(id) {
            tracing::debug!(node_id = %id, "jump target not found");
            return false;
        }
        self.pending.clear();
        self.enter(id, false, presenter)
    }

    fn enter(&mut self, id: NodeId, check_gate: bool, presenter: &mut dyn Presenter) -> bool {
        let Some((node, slot)) = self.pool.try_get_node_by_id(id) else {
            tracing::debug!(node_id = %id, "entry failed: node not found");
            return false;
        };

        if check_gate && !self.flags.has_all(self.pool.required_flags(node)) {
            tracing::debug!(node_id = %id, "entry blocked by flag requirements");
            return false;
        }

        self.flags.set_all(self.pool.effect_flags(node));
        self.cursor = Cursor::Active(slot);
        tracing::debug!(node_id = %id, slot, "entered node");

        presenter.on_node_entered(node, &self.pool, &self.flags);
        true
    }

    fn stall(&mut self) -> StepOutcome {
        tracing::debug!("no entry succeeded; runner stalled");
        self.cursor = Cursor::Idle;
        StepOutcome::Stalled
    }
}
