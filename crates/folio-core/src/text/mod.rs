pub mod anchor;
pub mod reading_order;

pub use anchor::{resolve, resolve_trimmed};
pub use reading_order::{assemble_page_text, bounding_box, page_text, BBox, PageTextMode, TextUnit};

use serde::{Deserialize, Serialize, Serializer};

/// The full text buffer of one recognition pass.
///
/// Offsets into it count characters, not bytes. Slicing is total: ranges are
/// clamped to the buffer and never panic on non-ASCII text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<String>")]
pub struct FullText {
    text: String,
    /// Byte offset of every character plus a trailing `text.len()`.
    /// `None` when the text is ASCII and offsets are byte positions already.
    char_starts: Option<Vec<usize>>,
}

impl FullText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let char_starts = if text.is_ascii() {
            None
        } else {
            let mut starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
            starts.push(text.len());
            Some(starts)
        };
        Self { text, char_starts }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn char_len(&self) -> usize {
        match &self.char_starts {
            Some(starts) => starts.len() - 1,
            None => self.text.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Characters `[start, end)`, clamped to the buffer. Inverted ranges are empty.
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let len = self.char_len();
        let end = end.min(len);
        let start = start.min(end);
        &self.text[self.byte_offset(start)..self.byte_offset(end)]
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        match &self.char_starts {
            Some(starts) => starts[char_index],
            None => char_index,
        }
    }
}

impl From<String> for FullText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for FullText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<Option<String>> for FullText {
    fn from(text: Option<String>) -> Self {
        Self::new(text.unwrap_or_default())
    }
}

impl Serialize for FullText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}
