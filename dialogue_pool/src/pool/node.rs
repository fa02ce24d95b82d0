//! Node definitions.

use serde::{Deserialize, Serialize};

use super::{NodeId, Span};

/// How the presenter should advance past a node. Parsed from the raw
/// `advancePolicy` column; the core itself never acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AdvancePolicy {
    /// Wait for player input.
    #[default]
    Default,
    /// Ignore skip/auto input until the line has fully played.
    Block,
    /// Reveal the full line immediately.
    Fast,
    /// Reveal and advance without waiting.
    FastForward,
}

impl AdvancePolicy {
    /// Case-insensitive parse. Unknown values fall back to `Default`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "block" => AdvancePolicy::Block,
            "fast" => AdvancePolicy::Fast,
            "fastforward" => AdvancePolicy::FastForward,
            _ => AdvancePolicy::Default,
        }
    }
}

/// One narrative beat.
///
/// Presentation hints (`actors`, `bgm`, `sfx`, `cg`, `transition`,
/// `advance_policy`) are opaque strings handed through to the presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Node {
    pub id: NodeId,

    /// Free-form spreadsheet key from the first column.
    pub index_key: String,

    /// Dialogue / narration / monologue tag.
    pub row_type: String,
    pub speaker: String,
    /// Raw, unprocessed line text.
    pub text: String,
    pub actors: Option<String>,
    pub bgm: String,
    pub sfx: String,
    pub cg: String,
    pub transition: String,
    pub advance_policy: String,

    /// Linear successor.
    pub next: Option<NodeId>,

    /// Flags set on entry.
    pub flags_set: Span,
    /// Flags required to enter.
    pub flags_req: Span,
    /// This node's run in the choice pool.
    pub choices: Span,

    /// False for placeholder nodes that exist only because a choice row
    /// referenced them.
    pub authored: bool,
}

impl Node {
    /// An empty shell for a parent referenced by a choice before its own row.
    pub fn placeholder(id: NodeId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    pub fn advance_policy_kind(&self) -> AdvancePolicy {
        AdvancePolicy::parse(&self.advance_policy)
    }

    /// Overwrite every authored field with a draft, leaving the id and the
    /// choice run untouched. An empty index key keeps the previous one.
    pub fn apply(&mut self, draft: NodeDraft) {
        if !draft.index_key.is_empty() {
            self.index_key = draft.index_key;
        }
        self.row_type = draft.row_type;
        self.speaker = draft.speaker;
        self.text = draft.text;
        self.actors = draft.actors;
        self.bgm = draft.bgm;
        self.sfx = draft.sfx;
        self.cg = draft.cg;
        self.transition = draft.transition;
        self.advance_policy = draft.advance_policy;
        self.next = draft.next;
        self.flags_set = draft.flags_set;
        self.flags_req = draft.flags_req;
        self.authored = true;
    }
}

/// The fields a single Node row declares.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeDraft {
    pub index_key: String,
    pub row_type: String,
    pub speaker: String,
    pub text: String,
    pub actors: Option<String>,
    pub bgm: String,
    pub sfx: String,
    pub cg: String,
    pub transition: String,
    pub advance_policy: String,
    pub next: Option<NodeId>,
    pub flags_set: Span,
    pub flags_req: Span,
}
