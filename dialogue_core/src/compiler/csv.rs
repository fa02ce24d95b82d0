//! Row splitting for the 17-column script format.

/// Number of positional columns in a script row.
pub const COLUMN_COUNT: usize = 17;

/// Reference header for the script format. The compiler skips line 1 without
/// reading it, so this is documentation for authoring tools.
pub const SCRIPT_HEADER: &str = "Index,nodeId,rowType,speaker,text,actors,bgm,sfx,cg,transition,advancePolicy,nextNodeId,choiceLabel,choiceGoto,choiceSet,flagsSet,flagsReq";

/// Raw text of one script row, column by column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowFields {
    pub index_key: String,
    pub node_id: String,
    pub row_type: String,
    pub speaker: String,
    pub text: String,
    pub actors: String,
    pub bgm: String,
    pub sfx: String,
    pub cg: String,
    pub transition: String,
    pub advance_policy: String,
    pub next_node_id: String,
    pub choice_label: String,
    pub choice_goto: String,
    pub choice_set: String,
    pub flags_set: String,
    pub flags_req: String,
}

impl RowFields {
    /// True when the row declares a choice rather than a node.
    pub fn is_choice(&self) -> bool {
        self.row_type.eq_ignore_ascii_case("choice")
    }
}

/// Split one line into exactly [`COLUMN_COUNT`] fields.
///
/// Double quotes toggle quoting and `""` inside quotes is a literal quote.
/// Missing trailing columns are empty; anything after the last column is
/// dropped. An unterminated quote runs to the end of the line.
pub fn split_row(line: &str) -> RowFields {
    let mut slots: [String; COLUMN_COUNT] = Default::default();
    let mut slot = 0;
    let mut current = String::with_capacity(line.len());
    let mut in_quote = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quote {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quote = false;
                }
            } else {
                current.push(c);
            }
        } else if c == ',' {
            slots[slot] = std::mem::take(&mut current);
            slot += 1;
            if slot >= COLUMN_COUNT {
                break;
            }
        } else if c == '"' {
            in_quote = true;
        } else {
            current.push(c);
        }
    }
    if slot < COLUMN_COUNT {
        slots[slot] = current;
    }

    let [index_key, node_id, row_type, speaker, text, actors, bgm, sfx, cg, transition, advance_policy, next_node_id, choice_label, choice_goto, choice_set, flags_set, flags_req] =
        slots;

    RowFields {
        index_key,
        node_id,
        row_type,
        speaker,
        text,
        actors,
        bgm,
        sfx,
        cg,
        transition,
        advance_policy,
        next_node_id,
        choice_label,
        choice_goto,
        choice_set,
        flags_set,
        flags_req,
    }
}
