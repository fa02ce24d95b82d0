//! Script Compiler - turns a CSV-encoded branching script into a [`PoolStore`].
//!
//! The first line is a header and is skipped unconditionally. Every other
//! non-blank line is one row of [`COLUMN_COUNT`] positional columns and is
//! either a **Node** row or, when `rowType` is `Choice`, a **Choice** row
//! attached to the node named in its `nodeId` column.
//!
//! Node rows are insert-or-update: repeating an id patches the existing slot,
//! so one logical node may be spread over several physical rows. A choice
//! whose parent has not been declared yet creates an empty placeholder node
//! for it.

mod csv;
mod fields;

pub use csv::*;
pub use fields::*;

use dialogue_pool::{Choice, NodeDraft, PoolError, PoolLimits, PoolStore};

use crate::{DialogueError, EngineConfig, Result};

/// Compiles script text into pools bounded by a set of [`PoolLimits`].
#[derive(Debug, Clone, Default)]
pub struct ScriptCompiler {
    limits: PoolLimits,
}

impl ScriptCompiler {
    pub fn new(limits: PoolLimits) -> Self {
        Self { limits }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.limits)
    }

    pub fn limits(&self) -> PoolLimits {
        self.limits
    }

    /// Compile a script into a fresh pool.
    pub fn compile(&self, text: &str) -> Result<PoolStore> {
        let mut pool = PoolStore::new(self.limits);
        self.compile_into(&mut pool, text)?;
        Ok(pool)
    }

    /// Reset `pool` and compile `text` into it, reusing its allocations.
    ///
    /// The pool keeps its own limits. On error the pool holds a partial
    /// compile and must not be run.
    pub fn compile_into(&self, pool: &mut PoolStore, text: &str) -> Result<()> {
        pool.reset();

        let mut lines = text.lines();
        if lines.next().is_none() {
            return Err(DialogueError::EmptyScript);
        }

        for (offset, line) in lines.enumerate() {
            let line_no = offset + 2;
            if line.trim().is_empty() {
                continue;
            }

            let row = split_row(line);
            if row.is_choice() {
                compile_choice(pool, &row, line_no)?;
            } else {
                compile_node(pool, row, line_no)?;
            }
        }

        tracing::info!(
            nodes = pool.node_count(),
            choices = pool.choice_count(),
            flag_refs = pool.flag_ref_count(),
            "compiled dialogue script"
        );
        Ok(())
    }
}

/// Compile with the default limits.
pub fn compile(text: &str) -> Result<PoolStore> {
    ScriptCompiler::default().compile(text)
}

fn at_line(line: usize) -> impl FnOnce(PoolError) -> DialogueError {
    move |source| DialogueError::Compile { line, source }
}

fn compile_choice(pool: &mut PoolStore, row: &RowFields, line: usize) -> Result<()> {
    let label = row.choice_label.trim();
    if label.is_empty() {
        tracing::debug!(line, "skipping choice row without a label");
        return Ok(());
    }

    let parent = parse_parent_id(&row.node_id).ok_or_else(|| DialogueError::InvalidNodeId {
        line,
        text: row.node_id.clone(),
    })?;
    let goto = parse_target(&row.choice_goto);

    let parent_slot = pool.ensure_node(parent).map_err(at_line(line))?;
    let set_flags = pool
        .push_flags(&parse_flag_list(&row.choice_set))
        .map_err(at_line(line))?;
    pool.attach_choice(parent_slot, Choice::new(label, goto, set_flags))
        .map_err(at_line(line))
}

fn compile_node(pool: &mut PoolStore, row: RowFields, line: usize) -> Result<()> {
    let id = parse_node_id(&row.node_id).ok_or_else(|| DialogueError::InvalidNodeId {
        line,
        text: row.node_id.clone(),
    })?;

    let flags_set = pool
        .push_flags(&parse_flag_list(&row.flags_set))
        .map_err(at_line(line))?;
    let flags_req = pool
        .push_flags(&parse_flag_list(&row.flags_req))
        .map_err(at_line(line))?;

    let draft = NodeDraft {
        actors: expand_actors(&row.actors),
        next: parse_target(&row.next_node_id),
        index_key: row.index_key,
        row_type: row.row_type,
        speaker: row.speaker,
        text: row.text,
        bgm: row.bgm,
        sfx: row.sfx,
        cg: row.cg,
        transition: row.transition,
        advance_policy: row.advance_policy,
        flags_set,
        flags_req,
    };

    let (_, inserted) = pool.upsert_node(id, draft).map_err(at_line(line))?;
    if !inserted {
        tracing::debug!(node_id = %id, line, "node re-declared; fields patched in place");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialogue_pool::{NodeId, PoolKind};

    const HEADER: &str = SCRIPT_HEADER;

    fn script(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn test_header_is_skipped() {
        // A header that looks like a node row must still be ignored.
        let pool = compile("k,1,Node,Speaker,Text\n_,2,Node,,Real").unwrap();
        assert_eq!(pool.node_count(), 1);
        assert!(pool.contains(NodeId(2)));
        assert!(!pool.contains(NodeId(1)));
    }

    #[test]
    fn test_empty_script_is_error() {
        assert!(matches!(compile(""), Err(DialogueError::EmptyScript)));
        assert_eq!(compile(HEADER).unwrap().node_count(), 0);
    }

    #[test]
    fn test_node_row_fields() {
        let pool = compile(&script(&[
            "intro,1,Dialogue,Mina,\"Hi, there.\",mina,theme,door,cg01,fade,block,2,,,,4&5,3",
        ]))
        .unwrap();

        let (node, slot) = pool.try_get_node_by_id(NodeId(1)).unwrap();
        assert_eq!(slot, 0);
        assert_eq!(node.index_key, "intro");
        assert_eq!(node.row_type, "Dialogue");
        assert_eq!(node.speaker, "Mina");
        assert_eq!(node.text, "Hi, there.");
        assert_eq!(node.actors.as_deref(), Some("mina@C(in=fade)"));
        assert_eq!(node.bgm, "theme");
        assert_eq!(node.sfx, "door");
        assert_eq!(node.cg, "cg01");
        assert_eq!(node.transition, "fade");
        assert_eq!(node.advance_policy, "block");
        assert_eq!(node.next, Some(NodeId(2)));
        assert_eq!(pool.effect_flags(node), &[4, 5]);
        assert_eq!(pool.required_flags(node), &[3]);
        assert!(node.authored);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let pool = compile(&script(&["_,1,Node,,a", "", "   ", "_,2,Node,,b"])).unwrap();
        assert_eq!(pool.node_count(), 2);
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = format!("{HEADER}\r\n_,1,Node,,a,,,,,,,,,,,,7\r\n");
        let pool = compile(&text).unwrap();
        let (node, _) = pool.try_get_node_by_id(NodeId(1)).unwrap();
        assert_eq!(pool.required_flags(node), &[7]);
    }

    #[test]
    fn test_placeholder_parent() {
        let pool = compile(&script(&[
            r#"_,5,Choice,,,,,,,,,, "Go north",8,,,"#,
            r#"_,5,Node,Guide,"Welcome.",,,,,,,,,,,"#,
        ]))
        .unwrap();

        assert_eq!(pool.node_count(), 1);
        let (node, _) = pool.try_get_node_by_id(NodeId(5)).unwrap();
        assert_eq!(node.text, "Welcome.");
        assert_eq!(node.speaker, "Guide");

        let choices = pool.choices_of(node);
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].label, "Go north");
        assert_eq!(choices[0].goto, Some(NodeId(8)));
    }

    #[test]
    fn test_placeholder_fields_are_empty() {
        let pool = compile(&script(&["_,9-a,Choice,,,,,,,,,,Onward,10,1&2,,"])).unwrap();

        let (node, _) = pool.try_get_node_by_id(NodeId(9)).unwrap();
        assert!(!node.authored);
        assert!(node.text.is_empty());
        assert!(node.speaker.is_empty());
        assert!(node.actors.is_none());
        assert!(node.next.is_none());

        let choice = &pool.choices_of(node)[0];
        assert_eq!(pool.choice_flags(choice), &[1, 2]);
    }

    #[test]
    fn test_redeclaration_updates_in_place() {
        let pool = compile(&script(&[
            "a,3,Node,Old,First,,,,,,,4,,,,,",
            "_,3-1,Choice,,,,,,,,,,Stay,3,,,",
            "_,3-2,Choice,,,,,,,,,,Leave,4,,,",
            ",3,Node,New,Second,,,,,,,,,,,,",
        ]))
        .unwrap();

        assert_eq!(pool.node_count(), 1);
        let (node, _) = pool.try_get_node_by_id(NodeId(3)).unwrap();
        assert_eq!(node.speaker, "New");
        assert_eq!(node.text, "Second");
        assert_eq!(node.next, None);
        // Empty key keeps the first declaration's key.
        assert_eq!(node.index_key, "a");

        let labels: Vec<_> = pool.choices_of(node).iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Stay", "Leave"]);
    }

    #[test]
    fn test_choice_without_label_is_skipped() {
        let pool = compile(&script(&["_,4,Choice,,,,,,,,,,  ,7,1,,"])).unwrap();
        assert_eq!(pool.node_count(), 0);
        assert_eq!(pool.choice_count(), 0);
        assert_eq!(pool.flag_ref_count(), 0);
    }

    #[test]
    fn test_choice_without_goto() {
        let pool = compile(&script(&["_,1,Node,,a", "_,1,Choice,,,,,,,,,,Wait,,,,"])).unwrap();
        let (node, _) = pool.try_get_node_by_id(NodeId(1)).unwrap();
        assert_eq!(pool.choices_of(node)[0].goto, None);
    }

    #[test]
    fn test_malformed_numbers_degrade() {
        let pool = compile(&script(&["_,,Node,,empty id,,,,,,,next?,,,,x&3,"])).unwrap();
        let (node, _) = pool.try_get_node_by_id(NodeId(0)).unwrap();
        assert_eq!(node.text, "empty id");
        assert_eq!(node.next, Some(NodeId(0)));
        assert_eq!(pool.effect_flags(node), &[0, 3]);
    }

    #[test]
    fn test_negative_next_is_no_successor() {
        let pool = compile(&script(&["_,1,Node,,a,,,,,,,-1,,,,,"])).unwrap();
        assert_eq!(pool.try_get_node_by_id(NodeId(1)).unwrap().0.next, None);
    }

    #[test]
    fn test_negative_node_id_is_fatal() {
        let err = compile(&script(&["_,1,Node,,a", "_,-4,Node,,b"])).unwrap_err();
        assert!(matches!(err, DialogueError::InvalidNodeId { line: 3, .. }));
    }

    #[test]
    fn test_ampersand_flag_order() {
        let pool = compile(&script(&["_,1,Node,,a,,,,,,,,,,,12&7&3,"])).unwrap();
        let (node, _) = pool.try_get_node_by_id(NodeId(1)).unwrap();
        assert_eq!(pool.effect_flags(node), &[12, 7, 3]);
        assert!(pool.required_flags(node).is_empty());
    }

    #[test]
    fn test_capacity_boundary() {
        let compiler = ScriptCompiler::new(PoolLimits::new(3, 10, 10));
        let exact = script(&["_,1,Node,,a", "_,2,Node,,b", "_,3,Node,,c", "_,2,Node,,b again"]);
        assert_eq!(compiler.compile(&exact).unwrap().node_count(), 3);

        let over = script(&["_,1,Node,,a", "_,2,Node,,b", "_,3,Node,,c", "_,4,Node,,d"]);
        let err = compiler.compile(&over).unwrap_err();
        assert!(matches!(
            err,
            DialogueError::Compile {
                line: 5,
                source: PoolError::CapacityExceeded { pool: PoolKind::Nodes, limit: 3 },
            }
        ));
    }

    #[test]
    fn test_from_config_uses_limits() {
        let config = EngineConfig::from_toml_str("[limits]\nmax_nodes = 1\n").unwrap();
        let compiler = ScriptCompiler::from_config(&config);
        assert_eq!(compiler.limits().max_nodes, 1);

        let err = compiler
            .compile(&script(&["_,1,Node,,a", "_,2,Node,,b"]))
            .unwrap_err();
        assert!(matches!(
            err,
            DialogueError::Compile {
                line: 3,
                source: PoolError::CapacityExceeded { pool: PoolKind::Nodes, limit: 1 },
            }
        ));
    }

    #[test]
    fn test_interleaved_choice_runs() {
        // Choices for node 1 are split by a choice for node 2. The run keeps
        // its first offset and grows its count, so it swallows node 2's choice.
        let pool = compile(&script(&[
            "_,1,Node,,a",
            "_,2,Node,,b",
            "_,1-a,Choice,,,,,,,,,,A1,10,,,",
            "_,2-a,Choice,,,,,,,,,,B1,20,,,",
            "_,1-b,Choice,,,,,,,,,,A2,11,,,",
        ]))
        .unwrap();

        let (first, _) = pool.try_get_node_by_id(NodeId(1)).unwrap();
        assert_eq!(first.choices.offset, 0);
        assert_eq!(first.choices.count, 2);
        let labels: Vec<_> = pool.choices_of(first).iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["A1", "B1"]);

        let (second, _) = pool.try_get_node_by_id(NodeId(2)).unwrap();
        let labels: Vec<_> = pool.choices_of(second).iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["B1"]);
        assert_eq!(pool.choice_count(), 3);
    }

    #[test]
    fn test_placeholder_counts_against_capacity() {
        let compiler = ScriptCompiler::new(PoolLimits::new(1, 10, 10));
        let err = compiler
            .compile(&script(&["_,1,Node,,a", "_,2,Choice,,,,,,,,,,Go,1,,,"]))
            .unwrap_err();
        assert!(matches!(err, DialogueError::Compile { line: 3, .. }));
    }

    #[test]
    fn test_round_trip_reload() {
        let text = script(&[
            "s,1,Dialogue,Mina,Hello,mina,,,,,,2,,,,1,",
            "_,2,Narration,,The door creaks.,,,,,,,,,,,,1",
            "_,2,Choice,,,,,,,,,,Enter,3,2&3,,",
            "_,2,Choice,,,,,,,,,,Leave,4,,,",
            "_,3,Node,,Inside.,,,,,,,,,,,,2",
        ]);

        let compiler = ScriptCompiler::default();
        let first = compiler.compile(&text).unwrap();
        let second = compiler.compile(&text).unwrap();
        assert_eq!(first, second);

        // Recompiling into a used pool resets it instead of appending.
        let mut reused = compiler.compile(&script(&["_,9,Node,,stale,,,,,,,,,,,5&6,"])).unwrap();
        compiler.compile_into(&mut reused, &text).unwrap();
        assert_eq!(reused, first);
        assert!(!reused.contains(NodeId(9)));
    }
}
