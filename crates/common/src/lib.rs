/// Common types and utilities for US identity-document extraction
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Extraction errors
///
/// Every variant except `Task` represents the remote document processor
/// breaking its contract; none of them are recoverable in-process.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("processor response is missing its document payload")]
    MissingDocument,

    #[error("document payload is missing its entity list")]
    MissingEntities,

    #[error("portrait entity is missing its {0}")]
    PortraitField(&'static str),

    #[error("failed to parse page reference {0:?} as an integer")]
    PageNumber(String),

    #[error("entity {0:?} is missing its mention text")]
    MissingMentionText(String),

    #[error("document processor error: {0}")]
    Processor(String),

    #[error("portrait crop error: {0}")]
    Crop(String),

    #[error("background task failed: {0}")]
    Task(String),
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Supported US document types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    DriverLicense,
    Passport,
    Patent,
    IdProofing,
}

impl DocumentKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::DriverLicense => "driver_license",
            DocumentKind::Passport => "passport",
            DocumentKind::Patent => "patent",
            DocumentKind::IdProofing => "id_proofing",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind_display() {
        assert_eq!(DocumentKind::DriverLicense.to_string(), "driver_license");
        assert_eq!(DocumentKind::IdProofing.to_string(), "id_proofing");
    }

    #[test]
    fn test_document_kind_serialization() {
        let json = serde_json::to_string(&DocumentKind::Passport).unwrap();
        assert_eq!(json, "\"passport\"");
    }

    #[test]
    fn test_error_messages_name_the_missing_field() {
        let err = ExtractionError::PortraitField("page anchor");
        assert!(err.to_string().contains("page anchor"));

        let err = ExtractionError::PageNumber("abc".to_string());
        assert!(err.to_string().contains("abc"));
    }
}
