//! Block tree produced by the layout-analysis processor.
//!
//! Unlike page elements, these blocks carry their text inline instead of
//! anchoring into the document's full text.

use super::{de, Table};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentLayout {
    pub blocks: Vec<LayoutBlock>,
}

/// A node of the layout tree. Exactly one kind is present on the wire; a
/// block with none of the known kinds is kept as [`BlockKind::Unknown`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RawLayoutBlock", into = "RawLayoutBlock")]
pub struct LayoutBlock {
    pub block_id: Option<String>,
    pub page_span: Option<PageSpan>,
    pub kind: BlockKind,
}

impl LayoutBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Text(TextBlock {
                text: text.into(),
                ..TextBlock::default()
            }),
            ..Self::default()
        }
    }

    pub fn table(table: Table) -> Self {
        Self {
            kind: BlockKind::Table(table),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub enum BlockKind {
    Text(TextBlock),
    Table(Table),
    List(ListBlock),
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBlock {
    pub text: String,
    /// Semantic role such as `paragraph` or `heading-1`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub block_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<LayoutBlock>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListBlock {
    #[serde(alias = "list_entries")]
    pub list_entries: Vec<ListEntry>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub list_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListEntry {
    pub blocks: Vec<LayoutBlock>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSpan {
    #[serde(alias = "page_start", deserialize_with = "de::opt_u32")]
    pub page_start: Option<u32>,
    #[serde(alias = "page_end", deserialize_with = "de::opt_u32")]
    pub page_end: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawLayoutBlock {
    #[serde(alias = "block_id", skip_serializing_if = "Option::is_none")]
    block_id: Option<String>,
    #[serde(alias = "page_span", skip_serializing_if = "Option::is_none")]
    page_span: Option<PageSpan>,
    #[serde(alias = "text_block", skip_serializing_if = "Option::is_none")]
    text_block: Option<TextBlock>,
    #[serde(alias = "table_block", skip_serializing_if = "Option::is_none")]
    table_block: Option<Table>,
    #[serde(alias = "list_block", skip_serializing_if = "Option::is_none")]
    list_block: Option<ListBlock>,
}

impl From<RawLayoutBlock> for LayoutBlock {
    fn from(raw: RawLayoutBlock) -> Self {
        let kind = if let Some(text) = raw.text_block {
            BlockKind::Text(text)
        } else if let Some(table) = raw.table_block {
            BlockKind::Table(table)
        } else if let Some(list) = raw.list_block {
            BlockKind::List(list)
        } else {
            BlockKind::Unknown
        };
        LayoutBlock {
            block_id: raw.block_id,
            page_span: raw.page_span,
            kind,
        }
    }
}

impl From<LayoutBlock> for RawLayoutBlock {
    fn from(block: LayoutBlock) -> Self {
        let mut raw = RawLayoutBlock {
            block_id: block.block_id,
            page_span: block.page_span,
            ..RawLayoutBlock::default()
        };
        match block.kind {
            BlockKind::Text(text) => raw.text_block = Some(text),
            BlockKind::Table(table) => raw.table_block = Some(table),
            BlockKind::List(list) => raw.list_block = Some(list),
            BlockKind::Unknown => {}
        }
        raw
    }
}
