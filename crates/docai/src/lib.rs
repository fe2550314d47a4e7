//! Client for the cloud document-understanding service
//!
//! This crate models the slice of the Document AI surface the extraction
//! pipeline consumes: a processor is addressed by project, location, and
//! processor id; a raw document (bytes + MIME type) goes in; a document with
//! a flat list of typed entities comes out. Entities carry optional mention
//! text, confidence, and a page anchor with a normalized bounding polygon.
//!
//! The [`DocumentProcessor`] trait is the seam between the pipeline and the
//! network: production code uses [`HttpDocumentAi`], tests substitute a fake
//! that returns canned entity lists.

mod client;

pub use client::{DocumentProcessor, HttpDocumentAi, HttpDocumentAiConfig};

use id_doc_common::ExtractionError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the document processor client
#[derive(Debug, Error)]
pub enum DocAiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("processor returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
}

impl From<DocAiError> for ExtractionError {
    fn from(err: DocAiError) -> Self {
        ExtractionError::Processor(err.to_string())
    }
}

/// A deployed processor, addressed by location and id
///
/// One distinct processor exists per document type; the project id is shared
/// and supplied separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorRef {
    /// Processor region (e.g., "us")
    pub location: String,
    /// Processor id
    pub id: String,
}

impl ProcessorRef {
    /// Fully-qualified resource name of this processor
    #[must_use]
    pub fn resource_name(&self, project_id: &str) -> String {
        format!(
            "projects/{}/locations/{}/processors/{}",
            project_id, self.location, self.id
        )
    }

    /// Regional API endpoint serving this processor
    #[must_use]
    pub fn default_endpoint(&self) -> String {
        format!("https://{}-documentai.googleapis.com", self.location)
    }
}

/// Top-level response of a process-document call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    #[serde(default)]
    pub document: Option<Document>,
}

/// The processed document payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub entities: Option<Vec<Entity>>,
}

/// A single extracted field
///
/// Entities are unordered and multiple entities may share a type (repeated
/// fraud-signal evidence does).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Entity type name (e.g., "Family Name", "Portrait")
    #[serde(rename = "type", default)]
    pub entity_type: String,

    /// Literal text span associated with the entity
    #[serde(default)]
    pub mention_text: Option<String>,

    /// Extraction confidence, 0.0 to 1.0
    #[serde(default)]
    pub confidence: Option<f32>,

    /// Location of the entity within the source document
    #[serde(default)]
    pub page_anchor: Option<PageAnchor>,
}

/// Links an entity to one or more page regions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnchor {
    #[serde(default)]
    pub page_refs: Option<Vec<PageRef>>,
}

/// A single page region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRef {
    /// Zero-based page index; an int64, carried as a string by the
    /// service's proto-JSON encoding but accepted as a bare number too
    #[serde(default, deserialize_with = "page_number")]
    pub page: Option<String>,

    #[serde(default)]
    pub bounding_poly: Option<BoundingPoly>,
}

fn page_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(page)) => Some(page),
        Some(other) => Some(other.to_string()),
    })
}

/// Bounding polygon of a page region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingPoly {
    #[serde(default)]
    pub normalized_vertices: Option<Vec<NormalizedVertex>>,
}

/// A polygon corner as fractions of image width/height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedVertex {
    #[serde(default)]
    pub x: Option<f32>,

    #[serde(default)]
    pub y: Option<f32>,
}

impl NormalizedVertex {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processor_resource_name() {
        let processor = ProcessorRef {
            location: "us".to_string(),
            id: "abc123".to_string(),
        };
        assert_eq!(
            processor.resource_name("my-project"),
            "projects/my-project/locations/us/processors/abc123"
        );
        assert_eq!(
            processor.default_endpoint(),
            "https://us-documentai.googleapis.com"
        );
    }

    #[test]
    fn test_entity_deserialization() {
        let json = r#"{
            "type": "Family Name",
            "mentionText": "SAMPLE",
            "confidence": 0.98
        }"#;

        let entity: Entity = serde_json::from_str(json).unwrap();
        assert_eq!(entity.entity_type, "Family Name");
        assert_eq!(entity.mention_text.as_deref(), Some("SAMPLE"));
        assert!(entity.confidence.is_some());
        assert!(entity.page_anchor.is_none());
    }

    #[test]
    fn test_portrait_entity_deserialization() {
        let json = r#"{
            "type": "Portrait",
            "confidence": 0.99,
            "pageAnchor": {
                "pageRefs": [{
                    "page": "0",
                    "boundingPoly": {
                        "normalizedVertices": [
                            {"x": 0.1, "y": 0.1},
                            {"x": 0.9, "y": 0.1},
                            {"x": 0.9, "y": 0.9},
                            {"x": 0.1, "y": 0.9}
                        ]
                    }
                }]
            }
        }"#;

        let entity: Entity = serde_json::from_str(json).unwrap();
        let anchor = entity.page_anchor.unwrap();
        let refs = anchor.page_refs.unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].page.as_deref(), Some("0"));

        let vertices = refs[0]
            .bounding_poly
            .as_ref()
            .unwrap()
            .normalized_vertices
            .as_ref()
            .unwrap();
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0].x, Some(0.1));
    }

    #[test]
    fn test_page_ref_accepts_numeric_page() {
        let page_ref: PageRef = serde_json::from_str(r#"{"page": 0}"#).unwrap();
        assert_eq!(page_ref.page.as_deref(), Some("0"));

        let page_ref: PageRef = serde_json::from_str(r#"{"page": "2"}"#).unwrap();
        assert_eq!(page_ref.page.as_deref(), Some("2"));
    }

    #[test]
    fn test_vertex_with_absent_coordinates() {
        let vertex: NormalizedVertex = serde_json::from_str(r#"{"y": 0.5}"#).unwrap();
        assert!(vertex.x.is_none());
        assert_eq!(vertex.y, Some(0.5));
    }

    #[test]
    fn test_empty_response_deserialization() {
        let response: ProcessResponse = serde_json::from_str("{}").unwrap();
        assert!(response.document.is_none());

        let response: ProcessResponse =
            serde_json::from_str(r#"{"document": {}}"#).unwrap();
        assert!(response.document.unwrap().entities.is_none());
    }
}
