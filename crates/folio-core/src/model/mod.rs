//! Recognition results as returned by the document recognition service.
//!
//! Field names follow the service's JSON form (camelCase); snake_case keys
//! are accepted as aliases. Everything is optional on the wire, so every
//! struct defaults missing fields.

mod de;
pub mod layout;

pub use layout::{BlockKind, DocumentLayout, LayoutBlock, ListBlock, ListEntry, PageSpan, TextBlock};

use crate::error::FolioError;
use crate::text::FullText;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recognition pass over a source document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub text: FullText,
    pub pages: Vec<Page>,
    #[serde(alias = "document_layout", skip_serializing_if = "Option::is_none")]
    pub document_layout: Option<DocumentLayout>,
}

impl Document {
    /// Look up a page by its 1-based page number (not its index).
    pub fn page(&self, page_number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    pub fn page_numbers(&self) -> Vec<u32> {
        self.pages.iter().map(|p| p.page_number).collect()
    }

    /// Number of characters in the full text buffer.
    pub fn char_count(&self) -> usize {
        self.text.char_len()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    #[serde(alias = "page_number", deserialize_with = "de::u32_or_zero")]
    pub page_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    pub blocks: Vec<Block>,
    pub paragraphs: Vec<Paragraph>,
    pub lines: Vec<Line>,
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimension {
    pub width: f32,
    pub height: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Geometry and text reference shared by every page element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Layout {
    #[serde(alias = "text_anchor", skip_serializing_if = "Option::is_none")]
    pub text_anchor: Option<TextAnchor>,
    #[serde(alias = "bounding_poly", skip_serializing_if = "Option::is_none")]
    pub bounding_poly: Option<BoundingPoly>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Ordered character ranges into the full text of the pass that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextAnchor {
    #[serde(alias = "text_segments")]
    pub text_segments: Vec<TextSegment>,
}

impl TextAnchor {
    pub fn new(segments: impl IntoIterator<Item = TextSegment>) -> Self {
        Self {
            text_segments: segments.into_iter().collect(),
        }
    }

    /// Anchor covering a single half-open range.
    pub fn span(start: i64, end: i64) -> Self {
        Self::new([TextSegment::new(start, end)])
    }

    pub fn is_empty(&self) -> bool {
        self.text_segments.is_empty()
    }

    /// Largest end offset referenced by any segment (missing ends count as 0).
    pub fn max_end(&self) -> i64 {
        self.text_segments
            .iter()
            .map(|s| s.end_index.unwrap_or(0))
            .max()
            .unwrap_or(0)
    }
}

/// Half-open range `[start_index, end_index)`. Absent bounds are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSegment {
    #[serde(
        alias = "start_index",
        deserialize_with = "de::opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_index: Option<i64>,
    #[serde(
        alias = "end_index",
        deserialize_with = "de::opt_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_index: Option<i64>,
}

impl TextSegment {
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start_index: Some(start),
            end_index: Some(end),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoundingPoly {
    pub vertices: Vec<Vertex>,
    #[serde(alias = "normalized_vertices")]
    pub normalized_vertices: Vec<Vertex>,
}

impl BoundingPoly {
    pub fn from_vertices(vertices: impl IntoIterator<Item = (f32, f32)>) -> Self {
        Self {
            vertices: vertices.into_iter().map(|(x, y)| Vertex { x, y }).collect(),
            normalized_vertices: Vec::new(),
        }
    }
}

/// A polygon corner. The service omits zero coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
}

/// A unit of page content. Paragraphs and lines share the same shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Block {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
}

impl Block {
    pub fn new(anchor: TextAnchor, poly: BoundingPoly) -> Self {
        Self {
            layout: Some(Layout {
                text_anchor: Some(anchor),
                bounding_poly: Some(poly),
                confidence: None,
            }),
        }
    }
}

pub type Paragraph = Block;
pub type Line = Block;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Table {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(alias = "header_rows")]
    pub header_rows: Vec<TableRow>,
    #[serde(alias = "body_rows")]
    pub body_rows: Vec<TableRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Table {
    /// Iterate every cell in header-then-body order.
    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.header_rows
            .iter()
            .chain(self.body_rows.iter())
            .flat_map(|r| r.cells.iter())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }
}

/// A table cell. Its content arrives in one of two shapes depending on the
/// processor: a direct `layout` (form parsing) or a list of nested `blocks`
/// (layout analysis).
///
/// Spans are at least 1. The service omits a span of 1, and an absent or
/// zero span decodes as 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawTableCell", into = "RawTableCell")]
pub struct TableCell {
    pub content: CellContent,
    pub row_span: u32,
    pub col_span: u32,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            content: CellContent::Empty,
            row_span: 1,
            col_span: 1,
        }
    }
}

impl TableCell {
    pub fn with_anchor(anchor: TextAnchor) -> Self {
        Self {
            content: CellContent::Layout(Layout {
                text_anchor: Some(anchor),
                ..Layout::default()
            }),
            ..Self::default()
        }
    }

    pub fn with_blocks(blocks: Vec<LayoutBlock>) -> Self {
        Self {
            content: CellContent::Blocks(blocks),
            ..Self::default()
        }
    }

    pub fn anchor(&self) -> Option<&TextAnchor> {
        match &self.content {
            CellContent::Layout(layout) => layout.text_anchor.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum CellContent {
    /// cell -> layout -> text anchor
    Layout(Layout),
    /// cell -> blocks -> text/table/list block
    Blocks(Vec<LayoutBlock>),
    #[default]
    Empty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawTableCell {
    #[serde(skip_serializing_if = "Option::is_none")]
    layout: Option<Layout>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    blocks: Vec<LayoutBlock>,
    #[serde(alias = "row_span", deserialize_with = "de::span")]
    row_span: u32,
    #[serde(alias = "col_span", deserialize_with = "de::span")]
    col_span: u32,
}

impl Default for RawTableCell {
    fn default() -> Self {
        Self {
            layout: None,
            blocks: Vec::new(),
            row_span: 1,
            col_span: 1,
        }
    }
}

impl From<RawTableCell> for TableCell {
    /// A layout with anchor segments wins. Otherwise nested blocks are used
    /// when present, so a cell carrying both shapes keeps its nested text.
    fn from(raw: RawTableCell) -> Self {
        let anchored = raw
            .layout
            .as_ref()
            .and_then(|l| l.text_anchor.as_ref())
            .is_some_and(|a| !a.is_empty());
        let content = match (raw.layout, raw.blocks) {
            (Some(layout), _) if anchored => CellContent::Layout(layout),
            (_, blocks) if !blocks.is_empty() => CellContent::Blocks(blocks),
            (Some(layout), _) => CellContent::Layout(layout),
            (None, _) => CellContent::Empty,
        };
        TableCell {
            content,
            row_span: raw.row_span,
            col_span: raw.col_span,
        }
    }
}

impl From<TableCell> for RawTableCell {
    fn from(cell: TableCell) -> Self {
        let (layout, blocks) = match cell.content {
            CellContent::Layout(layout) => (Some(layout), Vec::new()),
            CellContent::Blocks(blocks) => (None, blocks),
            CellContent::Empty => (None, Vec::new()),
        };
        RawTableCell {
            layout,
            blocks,
            row_span: cell.row_span,
            col_span: cell.col_span,
        }
    }
}

/// Parse a recognition result from JSON.
///
/// Accepts either a bare document or a process response wrapping it
/// under `"document"`.
pub fn parse_document(json: &str) -> Result<Document, FolioError> {
    let mut value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(FolioError::InvalidDocument(
            "expected a JSON object at the top level".into(),
        ));
    }
    if let Some(inner) = value.get_mut("document") {
        if inner.is_object() {
            value = inner.take();
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// Load a recognition result from a JSON file.
pub fn load_document(path: &Path) -> Result<Document, FolioError> {
    let content = std::fs::read_to_string(path).map_err(|e| FolioError::DocumentLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_document(&content).map_err(|e| FolioError::DocumentLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
