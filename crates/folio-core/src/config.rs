use crate::error::FolioError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCATION: &str = "us";
pub const DEFAULT_MIME_TYPE: &str = "application/pdf";

/// Settings for reaching the recognition service's processors.
///
/// Built explicitly and handed to the backend and pipeline; nothing in the
/// core reads the environment on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub project_id: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    /// Processor for the broad OCR pass.
    pub ocr_processor: String,
    /// Processor for the targeted table pass. No table pass runs without it.
    #[serde(default)]
    pub form_processor: Option<String>,
    #[serde(default)]
    pub layout_processor: Option<String>,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_mime_type() -> String {
    DEFAULT_MIME_TYPE.to_string()
}

impl BackendConfig {
    pub fn new(project_id: impl Into<String>, ocr_processor: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            location: default_location(),
            mime_type: default_mime_type(),
            ocr_processor: ocr_processor.into(),
            form_processor: None,
            layout_processor: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn with_form_processor(mut self, id: impl Into<String>) -> Self {
        self.form_processor = Some(id.into());
        self
    }

    pub fn with_layout_processor(mut self, id: impl Into<String>) -> Self {
        self.layout_processor = Some(id.into());
        self
    }

    /// Read the configuration from `PROJECT_ID`, `LOCATION`, `MIME_TYPE`,
    /// `OCR_ID`, `FORM_ID` and `LAYOUT_ID`.
    pub fn from_env() -> Result<Self, FolioError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, FolioError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| FolioError::Config(format!("{key} is not set")))
        };

        let config = Self {
            project_id: required("PROJECT_ID")?,
            location: get("LOCATION").unwrap_or_else(default_location),
            mime_type: get("MIME_TYPE").unwrap_or_else(default_mime_type),
            ocr_processor: required("OCR_ID")?,
            form_processor: get("FORM_ID"),
            layout_processor: get("LAYOUT_ID"),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the settings the OCR and table passes need.
    pub fn validate(&self) -> Result<(), FolioError> {
        self.validate_service()?;
        require("ocr_processor", &self.ocr_processor)
    }

    /// Check the settings every request needs, whichever processor it targets.
    pub fn validate_service(&self) -> Result<(), FolioError> {
        for (field, value) in [
            ("project_id", &self.project_id),
            ("location", &self.location),
            ("mime_type", &self.mime_type),
        ] {
            require(field, value)?;
        }

        if self.location.contains('/') || self.location.contains('.') {
            return Err(FolioError::Config(format!(
                "invalid location '{}' (expected a region such as 'us' or 'eu')",
                self.location
            )));
        }

        Ok(())
    }

    /// Regional API endpoint host.
    pub fn endpoint(&self) -> String {
        format!("{}-documentai.googleapis.com", self.location)
    }

    /// Fully qualified resource name of a processor.
    pub fn processor_name(&self, processor_id: &str) -> String {
        format!(
            "projects/{}/locations/{}/processors/{}",
            self.project_id, self.location, processor_id
        )
    }
}

fn require(field: &str, value: &str) -> Result<(), FolioError> {
    if value.trim().is_empty() {
        return Err(FolioError::Config(format!("{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config =
            BackendConfig::from_lookup(lookup(&[("PROJECT_ID", "acme"), ("OCR_ID", "ocr1")]))
                .unwrap();
        assert_eq!(config.location, "us");
        assert_eq!(config.mime_type, "application/pdf");
        assert_eq!(config.form_processor, None);
    }

    #[test]
    fn test_from_lookup_full() {
        let config = BackendConfig::from_lookup(lookup(&[
            ("PROJECT_ID", "acme"),
            ("LOCATION", "eu"),
            ("OCR_ID", "ocr1"),
            ("FORM_ID", "form1"),
            ("LAYOUT_ID", ""),
        ]))
        .unwrap();
        assert_eq!(config.endpoint(), "eu-documentai.googleapis.com");
        assert_eq!(config.form_processor.as_deref(), Some("form1"));
        assert_eq!(config.layout_processor, None);
    }

    #[test]
    fn test_missing_required_key() {
        let err = BackendConfig::from_lookup(lookup(&[("OCR_ID", "ocr1")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid configuration: PROJECT_ID is not set");
    }

    #[test]
    fn test_processor_name() {
        let config = BackendConfig::new("acme", "ocr1").with_location("eu");
        assert_eq!(
            config.processor_name("form1"),
            "projects/acme/locations/eu/processors/form1"
        );
    }

    #[test]
    fn test_validate_rejects_bad_location() {
        let config = BackendConfig::new("acme", "ocr1").with_location("eu.example.com");
        assert!(matches!(config.validate(), Err(FolioError::Config(_))));
        let config = BackendConfig::new("acme", " ");
        assert!(config.validate().is_err());
        assert!(config.validate_service().is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: BackendConfig =
            serde_json::from_str(r#"{ "project_id": "acme", "ocr_processor": "ocr1" }"#).unwrap();
        assert_eq!(config, BackendConfig::new("acme", "ocr1"));
    }
}
