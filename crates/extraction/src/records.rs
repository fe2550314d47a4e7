//! Flat result records, one per document type
//!
//! Field names serialize in the camelCase shape the HTTP clients of this
//! service consume. A `None` field means the processor returned no entity of
//! the corresponding type; portrait fields carry the cropped portrait as
//! base64.

use serde::{Deserialize, Serialize};

/// Parsed US driver's license
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverLicenseRecord {
    pub address: Option<String>,
    pub date_of_birth: Option<String>,
    pub document_id: Option<String>,
    pub expiration_date: Option<String>,
    pub family_name: Option<String>,
    pub given_names: Option<String>,
    pub issue_date: Option<String>,
    /// Cropped portrait, base64-encoded in the upload's image format
    pub portrait_image: Option<String>,
}

/// Parsed US passport
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportRecord {
    pub address: Option<String>,
    pub date_of_birth: Option<String>,
    pub document_id: Option<String>,
    pub expiration_date: Option<String>,
    pub family_name: Option<String>,
    pub given_names: Option<String>,
    pub issue_date: Option<String>,
    pub mrz_code: Option<String>,
    /// Cropped portrait, base64-encoded in the upload's image format
    pub portrait_image: Option<String>,
}

/// Parsed US patent cover sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatentRecord {
    pub applicant_line1: Option<String>,
    pub application_number: Option<String>,
    pub class_international: Option<String>,
    #[serde(rename = "classUS")]
    pub class_us: Option<String>,
    pub filing_date: Option<String>,
    pub inventor_line1: Option<String>,
    pub issuer: Option<String>,
    pub patent_number: Option<String>,
    pub publication_date: Option<String>,
    pub title_line1: Option<String>,
}

/// Identity-proofing fraud signals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdProofingRecord {
    pub fraud_signals_is_identity_document: Option<String>,
    pub fraud_signals_suspicious_words: Option<String>,
    /// One element per suspicious-word evidence entity, in service order
    pub evidence_suspicious_word: Vec<String>,
    pub evidence_inconclusive_suspicious_word: Vec<String>,
    pub fraud_signals_image_manipulation: Option<String>,
    pub fraud_signals_online_duplicate: Option<String>,
    pub evidence_hostname: Vec<String>,
    pub evidence_thumbnail_url: Vec<String>,
}
