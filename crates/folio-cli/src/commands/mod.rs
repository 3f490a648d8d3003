pub mod extract;
pub mod info;
pub mod layout;
pub mod parse;
pub mod tables;

use folio_core::error::FolioError;
use folio_core::model::{load_document, Document};
use std::path::Path;

/// Load the primary document and, if given, the table-pass document.
pub(crate) fn load_pair(
    document: &Path,
    tables_from: Option<&Path>,
) -> Result<(Document, Option<Document>), FolioError> {
    let primary = load_document(document)?;
    let secondary = tables_from.map(load_document).transpose()?;
    Ok((primary, secondary))
}
