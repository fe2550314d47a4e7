//! Document parsing service
//!
//! One instance lives for the lifetime of the server and is shared by every
//! request; the injected [`DocumentProcessor`] handle is the only long-lived
//! resource. Each parse is a short linear pipeline: one remote call, then
//! in-memory normalization. The driver's-license and passport paths may
//! decode, crop, and re-encode the uploaded image, which is CPU-bound, so
//! their normalization runs on a blocking worker thread.

use std::sync::Arc;

use id_doc_common::{DocumentKind, ExtractionError, Result};
use id_doc_docai::{DocumentProcessor, Entity, ProcessorRef};
use tracing::info;

use crate::normalize;
use crate::records::{DriverLicenseRecord, IdProofingRecord, PassportRecord, PatentRecord};

/// Deployed processors, one per document type
#[derive(Debug, Clone)]
pub struct Processors {
    pub driver_license: ProcessorRef,
    pub id_proofing: ProcessorRef,
    pub passport: ProcessorRef,
    pub patent: ProcessorRef,
}

impl Processors {
    fn for_kind(&self, kind: DocumentKind) -> &ProcessorRef {
        match kind {
            DocumentKind::DriverLicense => &self.driver_license,
            DocumentKind::IdProofing => &self.id_proofing,
            DocumentKind::Passport => &self.passport,
            DocumentKind::Patent => &self.patent,
        }
    }
}

/// Parses US documents by delegating to the remote processor and
/// normalizing its entity list
pub struct DocumentService {
    processor: Arc<dyn DocumentProcessor>,
    processors: Processors,
}

impl DocumentService {
    #[must_use]
    pub fn new(processor: Arc<dyn DocumentProcessor>, processors: Processors) -> Self {
        Self {
            processor,
            processors,
        }
    }

    async fn entities_for(
        &self,
        kind: DocumentKind,
        image: &[u8],
        mime_type: &str,
    ) -> Result<Vec<Entity>> {
        info!(
            "Processing {} document ({} bytes, {})",
            kind,
            image.len(),
            mime_type
        );

        let response = self
            .processor
            .process(self.processors.for_kind(kind), image, mime_type)
            .await?;

        let entities = normalize::document_entities(response)?;
        info!("Processor returned {} entities for {}", entities.len(), kind);
        Ok(entities)
    }

    /// Parse a US driver's license image
    ///
    /// # Errors
    /// Returns an error when the remote call fails or the response breaks
    /// the extraction contract.
    pub async fn parse_driver_license(
        &self,
        image: Vec<u8>,
        mime_type: String,
    ) -> Result<DriverLicenseRecord> {
        let entities = self
            .entities_for(DocumentKind::DriverLicense, &image, &mime_type)
            .await?;

        tokio::task::spawn_blocking(move || {
            normalize::driver_license(&entities, &image, &mime_type)
        })
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))?
    }

    /// Parse a US passport image
    ///
    /// # Errors
    /// Returns an error when the remote call fails or the response breaks
    /// the extraction contract.
    pub async fn parse_passport(
        &self,
        image: Vec<u8>,
        mime_type: String,
    ) -> Result<PassportRecord> {
        let entities = self
            .entities_for(DocumentKind::Passport, &image, &mime_type)
            .await?;

        tokio::task::spawn_blocking(move || normalize::passport(&entities, &image, &mime_type))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))?
    }

    /// Parse a US patent cover sheet image
    ///
    /// # Errors
    /// Returns an error when the remote call fails or the response breaks
    /// the extraction contract.
    pub async fn parse_patent(&self, image: Vec<u8>, mime_type: String) -> Result<PatentRecord> {
        let entities = self
            .entities_for(DocumentKind::Patent, &image, &mime_type)
            .await?;

        Ok(normalize::patent(&entities))
    }

    /// Run identity-proofing over a document scan
    ///
    /// # Errors
    /// Returns an error when the remote call fails or the response breaks
    /// the extraction contract.
    pub async fn id_proof(&self, image: Vec<u8>, mime_type: String) -> Result<IdProofingRecord> {
        let entities = self
            .entities_for(DocumentKind::IdProofing, &image, &mime_type)
            .await?;

        normalize::id_proofing(&entities)
    }
}
