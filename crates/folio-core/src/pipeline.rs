use crate::backend::{ProcessRequest, RecognitionBackend};
use crate::config::BackendConfig;
use crate::error::FolioError;
use crate::model::Document;
use crate::tables::{
    layout_tables, select_table_pages, tables_for_page, verify_text_space, CrossPassPolicy,
    LayoutTable, TableGrid, TablePageSelection,
};
use crate::text::{page_text, PageTextMode, TextUnit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Options for running recognition passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassOptions {
    /// Restrict the broad pass to these 1-based pages.
    pub pages: Option<Vec<u32>>,
    /// Ask the broad pass to skip imagery.
    pub imageless: bool,
    pub table_pages: TablePageSelection,
}

/// Options for turning recognition results into text and tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembleOptions {
    pub text_mode: PageTextMode,
    pub text_unit: TextUnit,
    pub cross_pass: CrossPassPolicy,
}

/// The recognition results of one run.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Broad OCR pass: text source and page structure.
    pub primary: Document,
    /// Targeted table pass over a subset of pages, if one ran.
    pub secondary: Option<Document>,
}

/// Page text and tables of a document, keyed by page number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Characters in the text source.
    pub characters: usize,
    pub page_text: BTreeMap<u32, String>,
    /// Only pages with at least one table appear here.
    pub tables: BTreeMap<u32, Vec<TableGrid>>,
}

impl ExtractionResult {
    pub fn pages_with_tables(&self) -> Vec<u32> {
        self.tables.keys().copied().collect()
    }
}

/// Run the broad OCR pass and, when a form processor is configured, the
/// targeted table pass over the selected pages.
pub fn run_passes(
    backend: &dyn RecognitionBackend,
    config: &BackendConfig,
    content: &[u8],
    options: &PassOptions,
) -> Result<Extraction, FolioError> {
    config.validate()?;

    let mut request =
        ProcessRequest::new(config, &config.ocr_processor, content).imageless(options.imageless);
    if let Some(pages) = options.pages.as_deref() {
        request = request.with_pages(pages);
    }
    let primary = backend.process(&request)?;
    log::info!(
        "{}: OCR pass returned {} page(s), {} characters",
        backend.backend_name(),
        primary.pages.len(),
        primary.char_count()
    );

    let Some(form_processor) = config.form_processor.as_deref() else {
        return Ok(Extraction {
            primary,
            secondary: None,
        });
    };

    let table_pages = select_table_pages(&primary, options.table_pages);
    if table_pages.is_empty() {
        log::info!("no table pages selected; OCR output is enough");
        return Ok(Extraction {
            primary,
            secondary: None,
        });
    }
    log::info!("running table pass on pages {table_pages:?}");

    let request = ProcessRequest::new(config, form_processor, content).with_pages(&table_pages);
    let secondary = backend.process(&request)?;
    log::info!(
        "{}: table pass returned tables on pages {:?}",
        backend.backend_name(),
        secondary
            .pages
            .iter()
            .filter(|p| !p.tables.is_empty())
            .map(|p| p.page_number)
            .collect::<Vec<_>>()
    );

    Ok(Extraction {
        primary,
        secondary: Some(secondary),
    })
}

/// Assemble page text and tables from the primary pass, taking tables from
/// the secondary pass where it found some.
pub fn assemble(
    primary: &Document,
    secondary: Option<&Document>,
    options: &AssembleOptions,
) -> Result<ExtractionResult, FolioError> {
    if let Some(secondary) = secondary {
        if let Err(e) = verify_text_space(primary, secondary) {
            match options.cross_pass {
                CrossPassPolicy::Strict => return Err(e),
                CrossPassPolicy::Lenient => log::warn!("{e}; merging anyway"),
            }
        }
    }

    let mut result = ExtractionResult {
        characters: primary.char_count(),
        ..ExtractionResult::default()
    };

    for page in &primary.pages {
        let text = page_text(page, &primary.text, options.text_mode, options.text_unit);
        result.page_text.insert(page.page_number, text);

        let selected = tables_for_page(page, primary, secondary);
        if !selected.is_empty() {
            log::debug!(
                "page {}: {} table(s) from the {:?} pass",
                page.page_number,
                selected.len(),
                selected.origin
            );
            result.tables.insert(page.page_number, selected.grids());
        }
    }

    Ok(result)
}

/// Run all passes and assemble the result.
pub fn extract(
    backend: &dyn RecognitionBackend,
    config: &BackendConfig,
    content: &[u8],
    pass_options: &PassOptions,
    assemble_options: &AssembleOptions,
) -> Result<ExtractionResult, FolioError> {
    let extraction = run_passes(backend, config, content, pass_options)?;
    assemble(
        &extraction.primary,
        extraction.secondary.as_ref(),
        assemble_options,
    )
}

/// Run the layout-analysis processor over the whole document.
///
/// Needs no OCR processor; only the service settings and the layout
/// processor id are checked.
pub fn run_layout_pass(
    backend: &dyn RecognitionBackend,
    config: &BackendConfig,
    content: &[u8],
) -> Result<Document, FolioError> {
    config.validate_service()?;
    let processor = config
        .layout_processor
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| FolioError::Config("no layout processor configured".into()))?;

    let request = ProcessRequest::new(config, processor, content).imageless(true);
    let document = backend.process(&request)?;
    log::info!(
        "{}: layout pass returned {} page(s), {} characters",
        backend.backend_name(),
        document.pages.len(),
        document.char_count()
    );
    Ok(document)
}

/// Run the layout-analysis processor and collect its tables.
pub fn extract_layout_tables(
    backend: &dyn RecognitionBackend,
    config: &BackendConfig,
    content: &[u8],
) -> Result<Vec<LayoutTable>, FolioError> {
    let document = run_layout_pass(backend, config, content)?;
    Ok(layout_tables(&document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, BoundingPoly, Page, Table, TableCell, TableRow, TextAnchor};
    use crate::text::FullText;

    fn primary() -> Document {
        let text = FullText::new("Header\nName Qty\n");
        let page = Page {
            page_number: 1,
            blocks: vec![
                Block::new(
                    TextAnchor::span(7, 15),
                    BoundingPoly::from_vertices([(0.0, 40.0)]),
                ),
                Block::new(
                    TextAnchor::span(0, 6),
                    BoundingPoly::from_vertices([(0.0, 0.0)]),
                ),
            ],
            ..Page::default()
        };
        Document {
            text,
            pages: vec![
                page,
                Page {
                    page_number: 2,
                    ..Page::default()
                },
            ],
            document_layout: None,
        }
    }

    fn secondary(end: i64) -> Document {
        let table = Table {
            header_rows: vec![TableRow::new(vec![
                TableCell::with_anchor(TextAnchor::span(7, 11)),
                TableCell::with_anchor(TextAnchor::span(12, end)),
            ])],
            ..Table::default()
        };
        Document {
            text: FullText::new("Header\nName Qty\n"),
            pages: vec![Page {
                page_number: 1,
                tables: vec![table],
                ..Page::default()
            }],
            document_layout: None,
        }
    }

    #[test]
    fn test_assemble_merges_secondary_tables() {
        let result =
            assemble(&primary(), Some(&secondary(15)), &AssembleOptions::default()).unwrap();
        assert_eq!(result.characters, 16);
        assert_eq!(result.page_text[&1], "Header\nName Qty");
        assert_eq!(result.page_text[&2], "");
        assert_eq!(result.pages_with_tables(), vec![1]);
        assert_eq!(result.tables[&1][0].rows, vec![vec!["Name", "Qty"]]);
    }

    #[test]
    fn test_mismatch_is_fatal_by_default() {
        let err = assemble(&primary(), Some(&secondary(90)), &AssembleOptions::default())
            .unwrap_err();
        assert!(matches!(err, FolioError::CoordinateMismatch { page_number: 1, .. }));

        let options = AssembleOptions {
            cross_pass: CrossPassPolicy::Lenient,
            ..AssembleOptions::default()
        };
        let lenient = assemble(&primary(), Some(&secondary(90)), &options);
        assert_eq!(lenient.unwrap().tables[&1][0].rows, vec![vec!["Name", "Qty"]]);
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let a = assemble(&primary(), Some(&secondary(15)), &AssembleOptions::default()).unwrap();
        let b = assemble(&primary(), Some(&secondary(15)), &AssembleOptions::default()).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
