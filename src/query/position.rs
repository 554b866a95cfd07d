//! Cursor positions and the tag tokens around them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `<wb-...` opening-tag name, anchored at the `<`
static TAG_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<(wb-[\w-]+)").expect("tag name pattern is valid"));

/// `<` or a partial tag name right before the cursor
static TAG_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[\w-]*$").expect("tag start pattern is valid"));

/// Cursor position: 1-based line, 0-based character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Byte offset of `pos` in `text`.
///
/// Columns past the end of the line clamp to the line end; a line outside
/// the document yields `None`.
pub fn offset_at(text: &str, pos: Position) -> Option<usize> {
    let index = pos.line.checked_sub(1)? as usize;

    let mut line_start = 0;
    for (i, raw) in text.split('\n').enumerate() {
        if i == index {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            let within = line
                .char_indices()
                .nth(pos.column as usize)
                .map(|(byte, _)| byte)
                .unwrap_or(line.len());
            return Some(line_start + within);
        }
        line_start += raw.len() + 1;
    }
    None
}

/// Tag-name identifier the cursor at `offset` is on or touching.
///
/// The inspected window is the run of name characters around the cursor plus
/// the `<` right before it, so it never crosses a line and never cuts a name.
/// The span runs from the first character of the name to just past its last.
pub fn identifier_at(text: &str, offset: usize) -> Option<String> {
    if offset > text.len() || !text.is_char_boundary(offset) {
        return None;
    }

    let run_start = text[..offset]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_name_char(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(offset);
    let tag_start = run_start.checked_sub(1)?;
    if text.as_bytes()[tag_start] != b'<' {
        return None;
    }

    let caps = TAG_NAME.captures(&text[tag_start..])?;
    let name = caps.get(1)?;
    (offset <= tag_start + name.end()).then(|| name.as_str().to_string())
}

/// True if the text of the line before `offset` opens a tag.
pub fn is_tag_start(text: &str, offset: usize) -> bool {
    if offset > text.len() || !text.is_char_boundary(offset) {
        return false;
    }
    let line_start = text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    TAG_START.is_match(&text[line_start..offset])
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}
