use folio_core::backend::recorded::RecordedBackend;
use folio_core::config::{BackendConfig, DEFAULT_LOCATION, DEFAULT_MIME_TYPE};
use folio_core::pipeline::{self, AssembleOptions, ExtractionResult, PassOptions};
use folio_core::tables::{LayoutTable, TablePageSelection};
use folio_core::ExtractOptions;
use serde::Serialize;
use std::path::PathBuf;

use crate::output;

const LAYOUT_CELL_WIDTH: usize = 24;

/// Everything one `extract` run produces, printed as a single JSON document.
#[derive(Serialize)]
struct ExtractOutput {
    result: ExtractionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout_tables: Option<Vec<LayoutTable>>,
}

/// Processor settings; each falls back to the environment.
#[derive(clap::Args)]
pub struct BackendArgs {
    /// Cloud project that owns the processors
    #[arg(long, env = "PROJECT_ID")]
    project_id: String,

    /// Processor location
    #[arg(long, env = "LOCATION", default_value = DEFAULT_LOCATION)]
    location: String,

    /// MIME type sent with the document
    #[arg(long, env = "MIME_TYPE", default_value = DEFAULT_MIME_TYPE)]
    mime_type: String,

    /// OCR processor id
    #[arg(long, env = "OCR_ID")]
    ocr_id: String,

    /// Form parser processor id, enables the table pass
    #[arg(long, env = "FORM_ID")]
    form_id: Option<String>,

    /// Layout parser processor id, also prints layout-analysis tables
    #[arg(long, env = "LAYOUT_ID")]
    layout_id: Option<String>,
}

impl BackendArgs {
    fn config(self) -> BackendConfig {
        let mut config = BackendConfig::new(self.project_id, self.ocr_id)
            .with_location(self.location)
            .with_mime_type(self.mime_type);
        if let Some(form) = self.form_id.filter(|f| !f.is_empty()) {
            config = config.with_form_processor(form);
        }
        if let Some(layout) = self.layout_id.filter(|l| !l.is_empty()) {
            config = config.with_layout_processor(layout);
        }
        config
    }
}

pub fn pass_options(pages: Vec<u32>, imageless: bool, table_pages: TablePageSelection) -> PassOptions {
    PassOptions {
        pages: (!pages.is_empty()).then_some(pages),
        imageless,
        table_pages,
    }
}

pub fn run(
    input_file: PathBuf,
    recorded: PathBuf,
    backend_args: BackendArgs,
    passes: PassOptions,
    assemble: AssembleOptions,
    output_format: &str,
) -> Result<(), folio_core::error::FolioError> {
    let pdf_bytes = std::fs::read(&input_file)?;
    let config = backend_args.config();
    let backend = RecordedBackend::from_dir(recorded);
    let options = ExtractOptions { passes, assemble };

    log::info!(
        "extracting {} ({} bytes) with {}",
        input_file.display(),
        pdf_bytes.len(),
        config.endpoint()
    );
    let result = folio_core::extract_pdf(&pdf_bytes, &backend, &config, &options)?;
    let layout_tables = match config.layout_processor {
        Some(_) => Some(pipeline::extract_layout_tables(&backend, &config, &pdf_bytes)?),
        None => None,
    };
    let extracted = ExtractOutput {
        result,
        layout_tables,
    };

    match output_format {
        "json" => output::json::print(&extracted)?,
        _ => {
            output::table::print_result(&extracted.result);
            for (i, table) in extracted.layout_tables.iter().flatten().enumerate() {
                println!();
                output::table::print_layout_table(i + 1, table, LAYOUT_CELL_WIDTH);
            }
        }
    }
    Ok(())
}
