//! Post-compile validation.
//!
//! The runner tolerates dangling references by design: a missing target just
//! fails to enter and the story silently stalls. This pass walks every
//! reference up front so authoring tools can report those problems. It only
//! reads the pool; skipping it changes nothing at runtime.

use std::collections::{BTreeSet, VecDeque};

use dialogue_pool::{FlagId, NodeId, PoolStore, FLAG_CAPACITY};
use serde::Serialize;

/// A single problem found in a compiled script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// `nextNodeId` names a node that does not exist.
    DanglingNext { from: NodeId, target: NodeId },

    /// A choice's goto names a node that does not exist.
    DanglingChoice {
        from: NodeId,
        choice: usize,
        target: NodeId,
    },

    /// A node exists only because a choice row referenced it.
    PlaceholderOnly { node: NodeId },

    /// A flag id outside the flag store's range; it can never be set, so a
    /// requirement on it blocks forever.
    FlagOutOfRange { node: NodeId, flag: FlagId },

    /// Not reachable from the start node through next/goto links.
    Unreachable { node: NodeId },
}

/// Everything found by one validation pass, in pool order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

fn out_of_range(flag: FlagId) -> bool {
    usize::try_from(flag).map_or(true, |id| id >= FLAG_CAPACITY)
}

/// Check every reference in `pool`.
pub fn validate(pool: &PoolStore) -> ValidationReport {
    let mut issues = Vec::new();

    for node in pool.nodes() {
        if !node.authored {
            issues.push(Issue::PlaceholderOnly { node: node.id });
        }

        if let Some(target) = node.next {
            if !pool.contains(target) {
                issues.push(Issue::DanglingNext {
                    from: node.id,
                    target,
                });
            }
        }

        for (index, choice) in pool.choices_of(node).iter().enumerate() {
            if let Some(target) = choice.goto {
                if !pool.contains(target) {
                    issues.push(Issue::DanglingChoice {
                        from: node.id,
                        choice: index,
                        target,
                    });
                }
            }
        }

        let choice_flags = pool
            .choices_of(node)
            .iter()
            .flat_map(|choice| pool.choice_flags(choice));
        let flags: BTreeSet<FlagId> = pool
            .required_flags(node)
            .iter()
            .chain(pool.effect_flags(node))
            .chain(choice_flags)
            .copied()
            .filter(|&flag| out_of_range(flag))
            .collect();
        issues.extend(
            flags
                .into_iter()
                .map(|flag| Issue::FlagOutOfRange { node: node.id, flag }),
        );
    }

    ValidationReport { issues }
}

/// [`validate`], plus every node unreachable from `start`.
///
/// Reachability follows next and goto links only and ignores flag gates.
pub fn validate_from(pool: &PoolStore, start: NodeId) -> ValidationReport {
    let mut report = validate(pool);

    let mut seen = vec![false; pool.node_count()];
    let mut queue = VecDeque::new();
    if let Some(slot) = pool.slot_of(start) {
        seen[slot] = true;
        queue.push_back(slot);
    }

    while let Some(slot) = queue.pop_front() {
        let Some(node) = pool.node(slot) else {
            continue;
        };
        let targets = node
            .next
            .into_iter()
            .chain(pool.choices_of(node).iter().filter_map(|choice| choice.goto));

        for target in targets {
            if let Some(next_slot) = pool.slot_of(target) {
                if !seen[next_slot] {
                    seen[next_slot] = true;
                    queue.push_back(next_slot);
                }
            }
        }
    }

    report.issues.extend(
        pool.nodes()
            .iter()
            .zip(seen)
            .filter(|(_, reached)| !reached)
            .map(|(node, _)| Issue::Unreachable { node: node.id }),
    );
    report
}
