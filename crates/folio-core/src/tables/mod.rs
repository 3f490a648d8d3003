pub mod grid;
pub mod layout;
pub mod merge;

pub use grid::{build_table_grid, cell_text};
pub use layout::{layout_tables, LayoutTable};
pub use merge::{
    select_table_pages, tables_for_page, verify_text_space, CrossPassPolicy, PageTables,
    TableOrigin, TablePageSelection,
};

use serde::{Deserialize, Serialize};

/// A table resolved to strings: header rows first, then body rows.
///
/// Rows keep the cell count the backend delivered; ragged tables are not
/// padded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableGrid {
    /// Number of leading rows in `rows` that are header rows.
    pub header_rows: usize,
    pub rows: Vec<Vec<String>>,
}

impl TableGrid {
    pub fn header(&self) -> &[Vec<String>] {
        &self.rows[..self.header_rows.min(self.rows.len())]
    }

    pub fn body(&self) -> &[Vec<String>] {
        &self.rows[self.header_rows.min(self.rows.len())..]
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One line per row, cells joined by `separator`.
    pub fn to_delimited(&self, separator: &str) -> String {
        self.rows
            .iter()
            .map(|row| row.join(separator))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
