//! Fail-soft field readers. None of these ever reject input: malformed numbers
//! collapse to a default so loosely edited spreadsheet exports still load.

use dialogue_pool::{FlagId, NodeId};

/// Prefix integer reader: optional leading `-`, then the longest run of
/// digits. Empty input is `None`; input with no digits reads as `0`.
pub fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));

    Some(if negative { -magnitude } else { magnitude })
}

/// Node id column. Empty reads as node 0; `None` means the id is negative or
/// too large to address a node.
pub fn parse_node_id(text: &str) -> Option<NodeId> {
    let value = parse_int(text).unwrap_or(0);
    u32::try_from(value).ok().map(NodeId)
}

/// Parent id of a choice row: `"12"` or `"12-suffix"`.
pub fn parse_parent_id(text: &str) -> Option<NodeId> {
    let text = text.trim();
    let parent = match text.find('-') {
        Some(dash) if dash > 0 => &text[..dash],
        _ => text,
    };
    parse_node_id(parent)
}

/// `nextNodeId` / `choiceGoto` columns. Empty or negative means no target.
pub fn parse_target(text: &str) -> Option<NodeId> {
    let value = parse_int(text)?;
    u32::try_from(value).ok().map(NodeId)
}

/// `&`-joined flag ids, whitespace-insensitive. Blank tokens are skipped.
pub fn parse_flag_list(text: &str) -> Vec<FlagId> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .split('&')
        .filter(|token| !token.is_empty())
        .map(|token| {
            let value = parse_int(token).unwrap_or(0);
            value.clamp(i64::from(FlagId::MIN), i64::from(FlagId::MAX)) as FlagId
        })
        .collect()
}

/// Actor spec column. A bare single key is shorthand for "center, fade in".
pub fn expand_actors(text: &str) -> Option<String> {
    let spec = text.trim();
    if spec.is_empty() {
        return None;
    }

    let bare_key = !spec.contains(&['@', ';', ' '][..]);
    if bare_key {
        Some(format!("{spec}@C(in=fade)"))
    } else {
        Some(spec.to_string())
    }
}
