//! Environment configuration
//!
//! One processor is deployed per document type; each is addressed by a
//! location and an id pair of environment variables. Startup fails with a
//! descriptive error when a required variable is missing.

use anyhow::{Context, Result};

use id_doc_docai::ProcessorRef;
use id_doc_extraction::Processors;

/// Server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address (`API_SERVER_ADDR`, default `0.0.0.0:8080`)
    pub addr: String,

    /// Cloud project owning the processors (`GOOGLE_PROJECT_ID`)
    pub project_id: String,

    /// Bearer token for the document-understanding service
    /// (`DOCUMENT_AI_ACCESS_TOKEN`)
    pub access_token: String,

    /// Endpoint override (`DOCUMENT_AI_ENDPOINT`); unset in production,
    /// where each processor's regional endpoint applies
    pub endpoint: Option<String>,

    /// Per-document-type processors
    pub processors: Processors,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error naming the first missing required variable.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            addr: std::env::var("API_SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            project_id: required("GOOGLE_PROJECT_ID")?,
            access_token: required("DOCUMENT_AI_ACCESS_TOKEN")?,
            endpoint: std::env::var("DOCUMENT_AI_ENDPOINT").ok(),
            processors: Processors {
                driver_license: processor("DOCUMENT_AI_US_DRIVER_LICENSE_PROCESSOR")?,
                id_proofing: processor("DOCUMENT_AI_US_ID_PROOFING_PROCESSOR")?,
                passport: processor("DOCUMENT_AI_US_PASSPORT_PROCESSOR")?,
                patent: processor("DOCUMENT_AI_US_PATENT_PROCESSOR")?,
            },
        })
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}

fn processor(prefix: &str) -> Result<ProcessorRef> {
    Ok(ProcessorRef {
        location: required(&format!("{prefix}_LOCATION"))?,
        id: required(&format!("{prefix}_ID"))?,
    })
}
