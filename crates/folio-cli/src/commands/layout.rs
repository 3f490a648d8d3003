use folio_core::model::load_document;
use folio_core::tables::layout_tables;
use std::path::PathBuf;

use crate::output;

pub fn run(document: PathBuf, width: usize) -> Result<(), folio_core::error::FolioError> {
    let document = load_document(&document)?;
    let tables = layout_tables(&document);
    if tables.is_empty() {
        println!("No tables in the layout tree.");
        return Ok(());
    }
    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            println!();
        }
        output::table::print_layout_table(i + 1, table, width);
    }
    Ok(())
}
