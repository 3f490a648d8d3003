use folio_core::model::load_document;
use std::path::PathBuf;

pub fn run(document: PathBuf) -> Result<(), folio_core::error::FolioError> {
    let document = load_document(&document)?;

    let pages = document.page_numbers();
    let with_tables: Vec<u32> = document
        .pages
        .iter()
        .filter(|p| !p.tables.is_empty())
        .map(|p| p.page_number)
        .collect();

    println!("Characters:  {}", document.char_count());
    println!("Pages:       {} {:?}", pages.len(), pages);
    println!("With tables: {:?}", with_tables);
    if let Some(layout) = &document.document_layout {
        println!("Layout:      {} top-level block(s)", layout.blocks.len());
    }
    Ok(())
}
