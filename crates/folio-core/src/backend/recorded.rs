use crate::backend::{ProcessRequest, RecognitionBackend};
use crate::error::FolioError;
use crate::model::{load_document, Document};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Backend that replays responses previously captured from the recognition
/// service, one JSON file per processor id.
///
/// Page subsets are applied on replay by dropping pages outside the subset;
/// the full text buffer is kept whole so offsets stay valid.
#[derive(Debug, Clone, Default)]
pub struct RecordedBackend {
    responses: BTreeMap<String, PathBuf>,
    dir: Option<PathBuf>,
}

impl RecordedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `<dir>/<processor_id>.json` for processors without an
    /// explicit response.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            responses: BTreeMap::new(),
            dir: Some(dir.into()),
        }
    }

    pub fn with_response(mut self, processor_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.responses.insert(processor_id.into(), path.into());
        self
    }

    fn response_path(&self, processor_id: &str) -> Option<PathBuf> {
        if let Some(path) = self.responses.get(processor_id) {
            return Some(path.clone());
        }
        self.dir
            .as_deref()
            .map(|dir| dir.join(format!("{processor_id}.json")))
            .filter(|path| path.is_file())
    }
}

impl RecognitionBackend for RecordedBackend {
    fn process(&self, request: &ProcessRequest<'_>) -> Result<Document, FolioError> {
        let processor_id = request.processor_id();
        let path = self
            .response_path(processor_id)
            .ok_or_else(|| FolioError::UnknownProcessor(processor_id.to_string()))?;

        log::debug!(
            "replaying {} for {} ({} bytes of {})",
            path.display(),
            request.processor_name,
            request.content.len(),
            request.mime_type
        );
        let mut document = load_document(&path)?;

        if let Some(pages) = request.pages {
            let missing: Vec<u32> = pages
                .iter()
                .copied()
                .filter(|&n| document.page(n).is_none())
                .collect();
            if !missing.is_empty() {
                log::warn!("recorded {processor_id} response has no page(s) {missing:?}");
            }
            document.pages.retain(|p| pages.contains(&p.page_number));
        }
        Ok(document)
    }

    fn backend_name(&self) -> &str {
        "recorded"
    }
}
