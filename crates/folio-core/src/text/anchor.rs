use crate::model::{TextAnchor, TextSegment};
use crate::text::FullText;

/// Resolve a text anchor against the full text of the pass that produced it.
///
/// Segments are concatenated in listed order without separators. Absent
/// bounds count as 0, so a segment without an end is empty. Offsets outside
/// the buffer are clamped and inverted ranges yield nothing; recognition
/// output is advisory and this never fails.
pub fn resolve(anchor: Option<&TextAnchor>, text: &FullText) -> String {
    let Some(anchor) = anchor else {
        return String::new();
    };

    let mut out = String::new();
    for segment in &anchor.text_segments {
        out.push_str(segment_text(segment, text));
    }
    out
}

/// [`resolve`] with surrounding whitespace removed.
pub fn resolve_trimmed(anchor: Option<&TextAnchor>, text: &FullText) -> String {
    resolve(anchor, text).trim().to_string()
}

/// The slice a single segment addresses.
pub fn segment_text<'a>(segment: &TextSegment, text: &'a FullText) -> &'a str {
    let start = offset(segment.start_index);
    let end = offset(segment.end_index);

    if end < start {
        log::debug!("inverted text segment {start}..{end}, resolving to empty");
        return "";
    }
    if end > text.char_len() {
        log::debug!(
            "text segment {start}..{end} exceeds text length {}, clamping",
            text.char_len()
        );
    }
    text.slice(start, end)
}

fn offset(index: Option<i64>) -> usize {
    let index = index.unwrap_or(0).max(0);
    usize::try_from(index).unwrap_or(usize::MAX)
}
