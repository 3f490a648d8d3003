use folio_core::pipeline::ExtractionResult;
use folio_core::tables::{LayoutTable, TableGrid};

pub fn print_result(result: &ExtractionResult) {
    println!("{} character(s), {} page(s)\n", result.characters, result.page_text.len());

    for (page_number, text) in &result.page_text {
        println!("=== Page {page_number} ===\n");
        if text.is_empty() {
            println!("  (no text)");
        } else {
            for line in text.lines() {
                println!("  {line}");
            }
        }
        println!();

        if let Some(grids) = result.tables.get(page_number) {
            for (i, grid) in grids.iter().enumerate() {
                print_grid(i + 1, grid);
            }
        }
    }
}

/// One table as comma-separated rows, header rows marked.
pub fn print_grid(index: usize, grid: &TableGrid) {
    println!(
        "  Table {index} ({} row(s), {} header)",
        grid.row_count(),
        grid.header().len()
    );
    for row in grid.header() {
        println!("  * {}", row.join(", "));
    }
    for row in grid.body() {
        println!("    {}", row.join(", "));
    }
    println!();
}

/// One table as plain delimited rows.
pub fn print_delimited(index: usize, grid: &TableGrid) {
    println!("  Table {index}");
    for line in grid.to_delimited(", ").lines() {
        println!("    {line}");
    }
    println!();
}

pub fn print_layout_table(index: usize, table: &LayoutTable, width: usize) {
    let pages = match (table.page_start, table.page_end) {
        (Some(start), Some(end)) if start != end => format!("pages {start}-{end}"),
        (Some(start), _) => format!("page {start}"),
        _ => "unknown page".to_string(),
    };
    println!(
        "Table {index} (block {}, {pages})",
        table.block_id.as_deref().unwrap_or("-")
    );
    if let Some(caption) = &table.caption {
        println!("  {caption}");
    }
    for line in format_rows(&table.grid, width) {
        println!("  {line}");
    }
}

/// Rows as aligned columns of cells no wider than `width`.
fn format_rows(grid: &TableGrid, width: usize) -> Vec<String> {
    let cells: Vec<Vec<String>> = grid
        .rows
        .iter()
        .map(|row| row.iter().map(|c| format_cell(c, width)).collect())
        .collect();

    let columns = cells.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            cells
                .iter()
                .filter_map(|row| row.get(col))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    cells
        .iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:<w$}"))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Collapse a cell to one line and truncate it to `width` characters.
fn format_cell(text: &str, width: usize) -> String {
    let single = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single.chars().count() <= width {
        return single;
    }
    let keep = width.saturating_sub(3);
    let mut out: String = single.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cell_collapses_and_truncates() {
        assert_eq!(format_cell("Total\namount", 24), "Total amount");
        assert_eq!(format_cell("abcdefghij", 8), "abcde...");
        assert_eq!(format_cell("abcdefgh", 8), "abcdefgh");
        assert_eq!(format_cell("äöüäöü", 5), "äö...");
    }

    #[test]
    fn test_format_rows_aligns_columns() {
        let grid = TableGrid {
            header_rows: 1,
            rows: vec![
                vec!["Name".into(), "Qty".into()],
                vec!["Bolt M8".into(), "10".into()],
                vec!["Nut".into()],
            ],
        };
        assert_eq!(
            format_rows(&grid, 24),
            vec!["Name    | Qty", "Bolt M8 | 10", "Nut"]
        );
    }
}
