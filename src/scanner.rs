//! Difficulty scanner: a cheap pre-pass over the raw chart text.
//!
//! Charts embed one note body per difficulty behind `&inote_<id>=` markers.
//! The scanner finds the markers without tokenizing the bodies, so a UI can
//! populate its difficulty selector before committing to a full parse.

use crate::error::ParseError;
use crate::model::DifficultyDescriptor;
use std::collections::BTreeMap;

/// Scan the chart text for difficulty sections.
///
/// Returns one descriptor per `&inote_<id>=` marker, keyed and ordered by
/// ascending id. Text with no recognizable sections yields an empty map,
/// not an error; the caller treats that as "no playable content".
pub fn scan_difficulties(text: &str) -> BTreeMap<u8, DifficultyDescriptor> {
    let mut found = BTreeMap::new();
    for line in text.lines() {
        if let Some(id) = marker_id(line) {
            found
                .entry(id)
                .or_insert_with(|| DifficultyDescriptor::new(id));
        }
    }
    found
}

/// The default difficulty selection: the highest id present.
pub fn default_difficulty(
    difficulties: &BTreeMap<u8, DifficultyDescriptor>,
) -> Option<&DifficultyDescriptor> {
    difficulties.values().next_back()
}

/// The chart title from the `&title=` header, if any. First one wins.
pub fn chart_title(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        line.trim_start()
            .strip_prefix("&title=")
            .map(|rest| rest.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

/// Parse a `&inote_<id>=` marker at the start of a line.
fn marker_id(line: &str) -> Option<u8> {
    let rest = line.trim_start().strip_prefix("&inote_")?;
    let (id_part, _) = rest.split_once('=')?;
    id_part.trim().parse().ok()
}

/// Slice out the note body for one difficulty id.
///
/// The body starts after the marker's `=` and runs until the next line
/// beginning with `&` (any directive) or end of text.
pub(crate) fn section_body(text: &str, id: u8) -> Result<&str, ParseError> {
    let mut offset = 0;
    let mut start = None;
    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if start.is_some() && line.trim_start().starts_with('&') {
            return Ok(&text[start.unwrap()..line_start]);
        }
        if start.is_none() && marker_id(line) == Some(id) {
            // Body begins right after '=' on the marker line.
            let eq = line.find('=').unwrap();
            start = Some(line_start + eq + 1);
        }
    }
    match start {
        Some(s) => Ok(&text[s..]),
        None => Err(ParseError::DifficultySectionMissing { id }),
    }
}
