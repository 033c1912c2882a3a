/// A run of text, either matching the query or passed through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub matched: bool,
}

impl<'a> Segment<'a> {
    fn plain(text: &'a str) -> Self {
        Self { text, matched: false }
    }

    fn marked(text: &'a str) -> Self {
        Self { text, matched: true }
    }
}

/// Split `text` into runs, marking every case-insensitive occurrence of
/// `query`.
///
/// Occurrences are taken left to right without overlap. The query is a
/// literal: `.`, `*`, `(` and friends match themselves. A blank query
/// yields the whole text as one unmarked segment.
pub fn highlight<'a>(text: &'a str, query: &str) -> Vec<Segment<'a>> {
    if query.trim().is_empty() {
        return vec![Segment::plain(text)];
    }

    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while pos < text.len() {
        match match_len(&text[pos..], &needle) {
            Some(len) => {
                if plain_start < pos {
                    segments.push(Segment::plain(&text[plain_start..pos]));
                }
                segments.push(Segment::marked(&text[pos..pos + len]));
                pos += len;
                plain_start = pos;
            }
            None => {
                pos += text[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if plain_start < text.len() || segments.is_empty() {
        segments.push(Segment::plain(&text[plain_start..]));
    }
    segments
}

/// Byte length of the prefix of `hay` that equals `needle` once lowercased.
/// A match must end on a character boundary of `hay`.
fn match_len(hay: &str, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (offset, ch) in hay.char_indices() {
        for lower in ch.to_lowercase() {
            if matched == needle.len() || needle[matched] != lower {
                return None;
            }
            matched += 1;
        }
        if matched == needle.len() {
            return Some(offset + ch.len_utf8());
        }
    }
    None
}
