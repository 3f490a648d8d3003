use folio_core::tables::{tables_for_page, verify_text_space};
use std::path::PathBuf;

use crate::output;

pub fn run(
    document: PathBuf,
    tables_from: Option<PathBuf>,
) -> Result<(), folio_core::error::FolioError> {
    let (primary, secondary) = super::load_pair(&document, tables_from.as_deref())?;
    if let Some(secondary) = &secondary {
        verify_text_space(&primary, secondary)?;
    }

    let mut found = 0;
    for page in &primary.pages {
        let selected = tables_for_page(page, &primary, secondary.as_ref());
        if selected.is_empty() {
            continue;
        }
        found += selected.len();
        println!(
            "Page {}: {} table(s) ({:?} pass)",
            page.page_number,
            selected.len(),
            selected.origin
        );
        for (i, grid) in selected.grids().iter().enumerate() {
            output::table::print_delimited(i + 1, grid);
        }
    }

    if found == 0 {
        println!("No tables found.");
    }
    Ok(())
}
