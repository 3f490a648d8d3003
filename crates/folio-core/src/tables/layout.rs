use crate::model::{BlockKind, Document, LayoutBlock};
use crate::tables::{build_table_grid, TableGrid};
use crate::text::FullText;
use serde::{Deserialize, Serialize};

/// A table found in the layout-analysis block tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutTable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_end: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub grid: TableGrid,
}

/// Collect every table in the document's layout tree, in document order.
///
/// Text blocks and list entries are walked recursively. Tables nested inside
/// table cells are not collected.
pub fn layout_tables(document: &Document) -> Vec<LayoutTable> {
    let mut out = Vec::new();
    if let Some(layout) = &document.document_layout {
        collect(&layout.blocks, &document.text, &mut out);
    }
    out
}

fn collect(blocks: &[LayoutBlock], text: &FullText, out: &mut Vec<LayoutTable>) {
    for block in blocks {
        match &block.kind {
            BlockKind::Text(text_block) => collect(&text_block.blocks, text, out),
            BlockKind::List(list) => {
                for entry in &list.list_entries {
                    collect(&entry.blocks, text, out);
                }
            }
            BlockKind::Table(table) => out.push(LayoutTable {
                block_id: block.block_id.clone(),
                page_start: block.page_span.and_then(|s| s.page_start),
                page_end: block.page_span.and_then(|s| s.page_end),
                caption: table.caption.clone().filter(|c| !c.trim().is_empty()),
                grid: build_table_grid(table, text),
            }),
            BlockKind::Unknown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_document;

    #[test]
    fn test_walks_text_and_list_blocks() {
        let json = r#"{
            "documentLayout": { "blocks": [
                { "blockId": "1", "textBlock": { "text": "Prices", "type": "heading-1", "blocks": [
                    { "blockId": "2", "pageSpan": { "pageStart": 1, "pageEnd": 1 }, "tableBlock": {
                        "headerRows": [{ "cells": [
                            { "blocks": [{ "textBlock": { "text": "Item" } }] },
                            { "blocks": [{ "textBlock": { "text": "Price\n" } }] }
                        ] }],
                        "bodyRows": [{ "cells": [
                            { "blocks": [{ "textBlock": { "text": "Bolt" } }] },
                            { "blocks": [{ "textBlock": { "text": "0.20" } }] }
                        ] }],
                        "caption": "Table 1"
                    } }
                ] } },
                { "blockId": "3", "listBlock": { "listEntries": [{ "blocks": [
                    { "blockId": "4", "pageSpan": { "pageStart": 2, "pageEnd": 2 }, "tableBlock": {
                        "bodyRows": [{ "cells": [{ "blocks": [{ "tableBlock": {} }] }, {}] }]
                    } }
                ] }] } }
            ] }
        }"#;
        let doc = parse_document(json).unwrap();
        let tables = layout_tables(&doc);
        assert_eq!(tables.len(), 2);

        assert_eq!(tables[0].block_id.as_deref(), Some("2"));
        assert_eq!(tables[0].page_start, Some(1));
        assert_eq!(tables[0].caption.as_deref(), Some("Table 1"));
        assert_eq!(
            tables[0].grid.rows,
            vec![vec!["Item", "Price"], vec!["Bolt", "0.20"]]
        );
        assert_eq!(tables[0].grid.header_rows, 1);

        assert_eq!(tables[1].page_start, Some(2));
        assert_eq!(tables[1].grid.rows, vec![vec!["", ""]]);
    }

    #[test]
    fn test_no_layout_tree() {
        assert!(layout_tables(&Document::default()).is_empty());
    }
}
