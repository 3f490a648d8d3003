pub mod backend;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod tables;
pub mod text;

use backend::RecognitionBackend;
use config::BackendConfig;
use error::FolioError;
use model::Document;
use pipeline::{AssembleOptions, ExtractionResult, PassOptions};

/// Main API entry point: extract page text and tables from a PDF.
///
/// Runs the broad OCR pass, then the targeted table pass when a form
/// processor is configured, and assembles both into per-page text and table
/// grids. Table cells always resolve against the OCR pass's text.
pub fn extract_pdf(
    pdf_bytes: &[u8],
    backend: &dyn RecognitionBackend,
    config: &BackendConfig,
    options: &ExtractOptions,
) -> Result<ExtractionResult, FolioError> {
    if pdf_bytes.is_empty() {
        return Err(FolioError::InvalidDocument("empty input".into()));
    }
    pipeline::extract(backend, config, pdf_bytes, &options.passes, &options.assemble)
}

/// Assemble text and tables from recognition results that are already at hand.
///
/// `secondary` is the structure source for tables; `primary` is always the
/// text source.
pub fn assemble_documents(
    primary: &Document,
    secondary: Option<&Document>,
    options: &AssembleOptions,
) -> Result<ExtractionResult, FolioError> {
    pipeline::assemble(primary, secondary, options)
}

/// Options for [`extract_pdf`].
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub passes: PassOptions,
    pub assemble: AssembleOptions,
}
