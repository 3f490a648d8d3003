pub mod recorded;

use crate::config::BackendConfig;
use crate::error::FolioError;
use crate::model::Document;

/// One call to a document recognition processor.
#[derive(Debug, Clone)]
pub struct ProcessRequest<'a> {
    /// Fully qualified processor name, see [`BackendConfig::processor_name`].
    pub processor_name: String,
    pub content: &'a [u8],
    pub mime_type: &'a str,
    /// 1-based pages to process; all pages when `None`.
    pub pages: Option<&'a [u32]>,
    /// Skip embedded imagery in the result, allowing more pages per
    /// synchronous call.
    pub imageless: bool,
}

impl<'a> ProcessRequest<'a> {
    pub fn new(config: &'a BackendConfig, processor_id: &str, content: &'a [u8]) -> Self {
        Self {
            processor_name: config.processor_name(processor_id),
            content,
            mime_type: &config.mime_type,
            pages: None,
            imageless: false,
        }
    }

    pub fn with_pages(mut self, pages: &'a [u32]) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn imageless(mut self, imageless: bool) -> Self {
        self.imageless = imageless;
        self
    }

    /// The trailing processor id of `processor_name`.
    pub fn processor_id(&self) -> &str {
        self.processor_name
            .rsplit('/')
            .next()
            .unwrap_or(&self.processor_name)
    }
}

/// Trait for document recognition backends.
pub trait RecognitionBackend: Send + Sync {
    /// Run one recognition pass and return its result.
    fn process(&self, request: &ProcessRequest<'_>) -> Result<Document, FolioError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let config = BackendConfig::new("acme", "ocr1").with_mime_type("image/tiff");
        let pages = [1, 2];
        let request = ProcessRequest::new(&config, "form1", b"%PDF")
            .with_pages(&pages)
            .imageless(true);
        assert_eq!(
            request.processor_name,
            "projects/acme/locations/us/processors/form1"
        );
        assert_eq!(request.processor_id(), "form1");
        assert_eq!(request.mime_type, "image/tiff");
        assert_eq!(request.pages, Some(&pages[..]));
        assert!(request.imageless);
    }
}
