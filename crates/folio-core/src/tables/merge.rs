//! Selecting tables across recognition passes.
//!
//! A broad OCR pass is the text source: it owns the full text and the page
//! structure. A targeted form-parsing pass over a subset of pages may be the
//! structure source for tables. The two are joined by page number only, and
//! cell anchors of selected tables always resolve against the text source.

use crate::error::FolioError;
use crate::model::{Document, Page, Table};
use crate::tables::{build_table_grid, TableGrid};
use crate::text::{anchor, FullText};
use serde::{Deserialize, Serialize};

/// Which pass a page's tables were taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableOrigin {
    Primary,
    Secondary,
}

/// What to do when the structure source fails the coordinate-space check.
///
/// A mismatch means cell anchors would be resolved against a buffer they do
/// not index, so the default aborts the merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossPassPolicy {
    /// Refuse to merge.
    #[default]
    Strict,
    /// Log a warning and merge anyway. Cell text may be clamped or wrong.
    Lenient,
}

/// Pages forwarded to the targeted table pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TablePageSelection {
    /// Every page the broad pass returned.
    #[default]
    All,
    /// Only pages where the broad pass already detected a table.
    WithTables,
}

/// The tables chosen for one page, bound to the text they must resolve against.
#[derive(Debug, Clone, Copy)]
pub struct PageTables<'a> {
    pub page_number: u32,
    pub origin: TableOrigin,
    tables: &'a [Table],
    text_source: &'a FullText,
}

impl<'a> PageTables<'a> {
    pub fn tables(&self) -> &'a [Table] {
        self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Resolve every table against the text source.
    pub fn grids(&self) -> Vec<TableGrid> {
        self.tables
            .iter()
            .map(|t| build_table_grid(t, self.text_source))
            .collect()
    }
}

/// Choose the tables for a primary page.
///
/// If the secondary pass has a page with the same page number and at least
/// one table there, its tables win; otherwise the primary page's own tables
/// (possibly none) are used. Either way the result resolves against the
/// primary document's full text.
pub fn tables_for_page<'a>(
    page: &'a Page,
    primary: &'a Document,
    secondary: Option<&'a Document>,
) -> PageTables<'a> {
    let secondary_tables = secondary
        .and_then(|doc| {
            doc.pages
                .iter()
                .find(|p| p.page_number == page.page_number && !p.tables.is_empty())
        })
        .map(|p| p.tables.as_slice());

    let (tables, origin) = match secondary_tables {
        Some(tables) => (tables, TableOrigin::Secondary),
        None => (page.tables.as_slice(), TableOrigin::Primary),
    };

    PageTables {
        page_number: page.page_number,
        origin,
        tables,
        text_source: &primary.text,
    }
}

/// Page numbers to forward to the targeted table pass, in page order of the
/// broad pass and without duplicates.
pub fn select_table_pages(document: &Document, selection: TablePageSelection) -> Vec<u32> {
    let mut pages = Vec::new();
    for page in &document.pages {
        let wanted = match selection {
            TablePageSelection::All => true,
            TablePageSelection::WithTables => !page.tables.is_empty(),
        };
        if wanted && !pages.contains(&page.page_number) {
            pages.push(page.page_number);
        }
    }
    pages
}

/// Check that the structure source's table anchors address the text source's
/// coordinate space.
///
/// Only pages that carry tables and also exist in the text source are
/// checked. Every cell anchor must end inside the text source, and when the
/// structure page has its own page anchor it must resolve to the same text
/// against both buffers.
pub fn verify_text_space(
    text_source: &Document,
    structure_source: &Document,
) -> Result<(), FolioError> {
    let text_len = text_source.char_count();

    for page in structure_source.pages.iter().filter(|p| !p.tables.is_empty()) {
        if text_source.page(page.page_number).is_none() {
            continue;
        }

        let furthest = page
            .tables
            .iter()
            .flat_map(|t| t.cells())
            .filter_map(|c| c.anchor())
            .map(|a| a.max_end())
            .max()
            .unwrap_or(0)
            .max(0);
        if usize::try_from(furthest).map_or(true, |end| end > text_len) {
            return Err(FolioError::CoordinateMismatch {
                page_number: page.page_number,
                reason: format!(
                    "table anchor ends at {furthest} but the text source has {text_len} characters"
                ),
            });
        }

        let page_anchor = page.layout.as_ref().and_then(|l| l.text_anchor.as_ref());
        if let Some(page_anchor) = page_anchor {
            let own = anchor::resolve_trimmed(Some(page_anchor), &structure_source.text);
            let shared = anchor::resolve_trimmed(Some(page_anchor), &text_source.text);
            if own != shared {
                return Err(FolioError::CoordinateMismatch {
                    page_number: page.page_number,
                    reason: "page anchor resolves to different text in the two passes".into(),
                });
            }
        }
    }

    Ok(())
}
