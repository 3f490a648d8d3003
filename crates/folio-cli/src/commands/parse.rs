use folio_core::pipeline::AssembleOptions;
use std::path::PathBuf;

use crate::output;

pub fn run(
    document: PathBuf,
    tables_from: Option<PathBuf>,
    options: &AssembleOptions,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), folio_core::error::FolioError> {
    let (primary, secondary) = super::load_pair(&document, tables_from.as_deref())?;
    let result = folio_core::assemble_documents(&primary, secondary.as_ref(), options)?;

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&result)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Assembled {} page(s), {} with tables, written to {}",
                result.page_text.len(),
                result.tables.len(),
                path.display()
            );
        }
        None => match output_format {
            "json" => output::json::print(&result)?,
            _ => output::table::print_result(&result),
        },
    }

    Ok(())
}
