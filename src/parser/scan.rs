//! Lexical scan for placeholder markers.
//!
//! In markup a `?` only counts as a placeholder in two positions: as the whole value
//! of a quoted attribute (`"?"`, `'?'`), or as the whole text of an element
//! (`>?</`). Every other `?` is plain text. The scan only tracks whether it is in
//! text, in a tag, or in a quoted value, it does not parse anything.

use super::MARKER;

#[derive(Clone, Copy, PartialEq)]
enum State {
    Text,
    Tag,
    Quoted { quote: u8, start: usize },
}

/// Byte offsets of the placeholder markers of a markup template, in document order
pub fn scan_markers(input: &str) -> Vec<usize> {
    let bytes = input.as_bytes();
    let marker = MARKER as u8;
    let mut state = State::Text;
    // offset of the `>` that closed the last tag
    let mut tag_end = None;
    let mut offsets = vec![];

    for (i, &b) in bytes.iter().enumerate() {
        state = match state {
            State::Text => {
                if b == b'<' {
                    State::Tag
                } else {
                    if b == marker
                        && i > 0
                        && tag_end == Some(i - 1)
                        && bytes[i + 1..].starts_with(b"</")
                    {
                        offsets.push(i);
                    }
                    State::Text
                }
            }
            State::Tag => match b {
                b'"' | b'\'' => State::Quoted { quote: b, start: i },
                b'>' => {
                    tag_end = Some(i);
                    State::Text
                }
                _ => State::Tag,
            },
            State::Quoted { quote, start } => {
                if b == quote {
                    State::Tag
                } else {
                    if b == marker && i == start + 1 && bytes.get(i + 1) == Some(&quote) {
                        offsets.push(i);
                    }
                    state
                }
            }
        };
    }

    offsets
}

/// Byte offsets of every marker, for templates without structure (SQL, commands)
pub fn scan_plain_markers(input: &str) -> Vec<usize> {
    input.match_indices(MARKER).map(|(i, _)| i).collect()
}

/// Splits `input` around the markers, dropping the markers themselves.
///
/// There is always one more fragment than there are offsets.
pub fn split_at_markers(input: &str, offsets: &[usize]) -> Vec<String> {
    let mut fragments = Vec::with_capacity(offsets.len() + 1);
    let mut start = 0;
    for &offset in offsets {
        fragments.push(input[start..offset].to_string());
        start = offset + MARKER.len_utf8();
    }
    fragments.push(input[start..].to_string());
    fragments
}
