use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    #[error("recognition backend failed: {0}")]
    Backend(String),

    #[error("no recorded response for processor '{0}'")]
    UnknownProcessor(String),

    #[error("failed to load document from {path}: {reason}")]
    DocumentLoad { path: PathBuf, reason: String },

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("tables for page {page_number} do not share the text pass's coordinate space: {reason}")]
    CoordinateMismatch { page_number: u32, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FolioError::CoordinateMismatch {
            page_number: 3,
            reason: "anchor ends at 90 but text has 40 characters".into(),
        };
        assert_eq!(
            err.to_string(),
            "tables for page 3 do not share the text pass's coordinate space: \
             anchor ends at 90 but text has 40 characters"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: FolioError = io_err.into();
        assert!(matches!(err, FolioError::Io(_)));
    }
}
