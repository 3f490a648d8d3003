use crate::model::{BlockKind, CellContent, LayoutBlock, Table, TableCell, TableRow};
use crate::tables::TableGrid;
use crate::text::{anchor, FullText};

/// Resolve a table to a grid of trimmed cell strings.
///
/// `text` must be the text source for this table: the full text of the pass
/// whose offsets the cell anchors use.
pub fn build_table_grid(table: &Table, text: &FullText) -> TableGrid {
    let rows = table
        .header_rows
        .iter()
        .chain(table.body_rows.iter())
        .map(|row| row_texts(row, text))
        .collect();

    TableGrid {
        header_rows: table.header_rows.len(),
        rows,
    }
}

pub fn row_texts(row: &TableRow, text: &FullText) -> Vec<String> {
    row.cells.iter().map(|cell| cell_text(cell, text)).collect()
}

/// Text of a single cell, trimmed.
///
/// Cells either anchor into the full text through their own layout, or wrap
/// their content in nested blocks. For nested blocks only the first one is
/// read, and only plain text is extracted from it: a cell holding a nested
/// table or list resolves to an empty string. This is a deliberate lossy
/// simplification.
pub fn cell_text(cell: &TableCell, text: &FullText) -> String {
    match &cell.content {
        CellContent::Layout(layout) => anchor::resolve_trimmed(layout.text_anchor.as_ref(), text),
        CellContent::Blocks(blocks) => blocks
            .first()
            .map(nested_text)
            .unwrap_or_default()
            .trim()
            .to_string(),
        CellContent::Empty => String::new(),
    }
}

/// Most deeply nested plain text along the first-child path.
fn nested_text(block: &LayoutBlock) -> String {
    match &block.kind {
        BlockKind::Text(text_block) => {
            let deeper = text_block
                .blocks
                .first()
                .map(nested_text)
                .unwrap_or_default();
            if deeper.trim().is_empty() {
                text_block.text.clone()
            } else {
                deeper
            }
        }
        BlockKind::Table(_) | BlockKind::List(_) | BlockKind::Unknown => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TextAnchor, TextBlock};

    fn anchored_row(text: &FullText, cells: &[&str]) -> TableRow {
        let cells = cells
            .iter()
            .map(|c| {
                let start = text.as_str().find(c).unwrap() as i64;
                TableCell::with_anchor(TextAnchor::span(start, start + c.len() as i64))
            })
            .collect();
        TableRow::new(cells)
    }

    #[test]
    fn test_header_then_body() {
        let text = FullText::new("Name Qty Bolt 10");
        let table = Table {
            header_rows: vec![anchored_row(&text, &["Name", "Qty"])],
            body_rows: vec![anchored_row(&text, &["Bolt", "10"])],
            ..Table::default()
        };
        let grid = build_table_grid(&table, &text);
        assert_eq!(grid.header_rows, 1);
        assert_eq!(
            grid.rows,
            vec![vec!["Name", "Qty"], vec!["Bolt", "10"]]
        );
    }

    #[test]
    fn test_ragged_rows_are_preserved() {
        let text = FullText::new("a b c d");
        let table = Table {
            body_rows: vec![
                anchored_row(&text, &["a"]),
                anchored_row(&text, &["b", "c", "d"]),
            ],
            ..Table::default()
        };
        let grid = build_table_grid(&table, &text);
        assert_eq!(grid.header_rows, 0);
        assert_eq!(grid.rows[0].len(), 1);
        assert_eq!(grid.rows[1].len(), 3);
    }

    #[test]
    fn test_cell_text_is_trimmed() {
        let text = FullText::new("  Bolt\n");
        let cell = TableCell::with_anchor(TextAnchor::span(0, 7));
        assert_eq!(cell_text(&cell, &text), "Bolt");
    }

    #[test]
    fn test_empty_rows_and_cells() {
        let text = FullText::new("x");
        let table = Table {
            body_rows: vec![TableRow::default(), TableRow::new(vec![TableCell::default()])],
            ..Table::default()
        };
        let grid = build_table_grid(&table, &text);
        assert_eq!(grid.rows, vec![Vec::<String>::new(), vec![String::new()]]);
    }

    #[test]
    fn test_nested_text_block_cell() {
        let text = FullText::default();
        let cell = TableCell::with_blocks(vec![
            LayoutBlock::text(" Total\n"),
            LayoutBlock::text("ignored"),
        ]);
        assert_eq!(cell_text(&cell, &text), "Total");
    }

    #[test]
    fn test_deepest_text_wins() {
        let text = FullText::default();
        let outer = LayoutBlock {
            kind: BlockKind::Text(TextBlock {
                text: "outer".into(),
                block_type: None,
                blocks: vec![LayoutBlock::text("inner")],
            }),
            ..LayoutBlock::default()
        };
        let cell = TableCell::with_blocks(vec![outer]);
        assert_eq!(cell_text(&cell, &text), "inner");
    }

    #[test]
    fn test_cell_with_empty_layout_uses_nested_blocks() {
        let text = FullText::new("Qty");
        let table: Table = serde_json::from_str(
            r#"{ "bodyRows": [{ "cells": [
                {
                    "layout": { "textAnchor": { "textSegments": [] } },
                    "blocks": [{ "textBlock": { "text": "Total" } }]
                },
                {
                    "layout": { "textAnchor": { "textSegments": [{ "endIndex": "3" }] } },
                    "blocks": [{ "textBlock": { "text": "ignored" } }]
                }
            ] }] }"#,
        )
        .unwrap();
        let grid = build_table_grid(&table, &text);
        assert_eq!(grid.rows, vec![vec!["Total", "Qty"]]);
    }

    #[test]
    fn test_nested_table_in_cell_is_empty() {
        let text = FullText::new("abc");
        let inner = Table {
            body_rows: vec![anchored_row(&text, &["abc"])],
            ..Table::default()
        };
        let cell = TableCell::with_blocks(vec![LayoutBlock::table(inner)]);
        assert_eq!(cell_text(&cell, &text), "");
    }
}
