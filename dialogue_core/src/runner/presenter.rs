//! Boundaries between the runner and the presentation layer.

use dialogue_pool::{Choice, FlagStore, Node, PoolStore};

/// Receives content from the runner.
///
/// Callbacks get shared borrows only, so a presenter cannot drive the runner
/// from inside a callback.
pub trait Presenter {
    /// Called exactly once per successful node entry.
    fn on_node_entered(&mut self, node: &Node, pool: &PoolStore, flags: &FlagStore);

    /// Called when the active node's choices should be offered.
    fn on_choices_ready(&mut self, choices: &[Choice]);

    /// Called when a node with no choices and no successor has finished.
    fn on_content_ended(&mut self) {}
}

/// External "busy" signal (transition playing, modal open, paused).
/// While it reports busy, `step` and `choose` do nothing.
pub trait AdvanceGate {
    fn is_busy(&self) -> bool;
}

/// A gate that never blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGate;

impl AdvanceGate for OpenGate {
    fn is_busy(&self) -> bool {
        false
    }
}

impl<F> AdvanceGate for F
where
    F: Fn() -> bool,
{
    fn is_busy(&self) -> bool {
        self()
    }
}

/// Headless presenter that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn on_node_entered(&mut self, node: &Node, _pool: &PoolStore, _flags: &FlagStore) {
        tracing::info!(node_id = %node.id, speaker = %node.speaker, "{}", node.text);
    }

    fn on_choices_ready(&mut self, choices: &[Choice]) {
        for (index, choice) in choices.iter().enumerate() {
            tracing::info!(index, goto = ?choice.goto, "choice: {}", choice.label);
        }
    }

    fn on_content_ended(&mut self) {
        tracing::info!("end of script");
    }
}
