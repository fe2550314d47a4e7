//! Entity lookup and per-document-type normalization

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use id_doc_common::{ExtractionError, Result};
use id_doc_docai::{Entity, ProcessResponse};
use tracing::debug;

use crate::records::{DriverLicenseRecord, IdProofingRecord, PassportRecord, PatentRecord};

// Identity-document entity types
const ADDRESS: &str = "Address";
const DATE_OF_BIRTH: &str = "Date Of Birth";
const DOCUMENT_ID: &str = "Document Id";
const EXPIRATION_DATE: &str = "Expiration Date";
const FAMILY_NAME: &str = "Family Name";
const GIVEN_NAMES: &str = "Given Names";
const ISSUE_DATE: &str = "Issue Date";
const MRZ_CODE: &str = "MRZ Code";
const PORTRAIT: &str = "Portrait";

// Patent entity types
const APPLICANT_LINE_1: &str = "applicant_line_1";
const APPLICATION_NUMBER: &str = "application_number";
const CLASS_INTERNATIONAL: &str = "class_international";
const CLASS_US: &str = "class_us";
const FILING_DATE: &str = "filing_date";
const INVENTOR_LINE_1: &str = "inventor_line_1";
const ISSUER: &str = "issuer";
const PATENT_NUMBER: &str = "patent_number";
const PUBLICATION_DATE: &str = "publication_date";
const TITLE_LINE_1: &str = "title_line_1";

// Identity-proofing entity types
const FRAUD_SIGNALS_IS_IDENTITY_DOCUMENT: &str = "fraud_signals_is_identity_document";
const FRAUD_SIGNALS_SUSPICIOUS_WORDS: &str = "fraud_signals_suspicious_words";
const FRAUD_SIGNALS_IMAGE_MANIPULATION: &str = "fraud_signals_image_manipulation";
const FRAUD_SIGNALS_ONLINE_DUPLICATE: &str = "fraud_signals_online_duplicate";
const EVIDENCE_SUSPICIOUS_WORD: &str = "evidence_suspicious_word";
const EVIDENCE_INCONCLUSIVE_SUSPICIOUS_WORD: &str = "evidence_inconclusive_suspicious_word";
const EVIDENCE_HOSTNAME: &str = "evidence_hostname";
const EVIDENCE_THUMBNAIL_URL: &str = "evidence_thumbnail_url";

/// Pull the entity list out of a processor response
///
/// A successful process call always carries a document with an entity list;
/// a response without either is a broken upstream contract.
///
/// # Errors
/// Returns an error when the document payload or its entity list is absent.
pub fn document_entities(response: ProcessResponse) -> Result<Vec<Entity>> {
    let document = response.document.ok_or(ExtractionError::MissingDocument)?;
    document.entities.ok_or(ExtractionError::MissingEntities)
}

/// Lookup helper over one response's entity list
///
/// All lookups preserve the order the service returned the entities in;
/// duplicated types resolve to the first match for scalar fields.
pub struct EntityIndex<'a> {
    entities: &'a [Entity],
}

impl<'a> EntityIndex<'a> {
    #[must_use]
    pub fn new(entities: &'a [Entity]) -> Self {
        Self { entities }
    }

    /// First entity of the given type, in service order
    #[must_use]
    pub fn first(&self, type_name: &str) -> Option<&'a Entity> {
        self.entities.iter().find(|e| e.entity_type == type_name)
    }

    /// Mention text of the first entity of the given type
    ///
    /// Absent entity, absent mention text, and empty mention text all map
    /// to `None`.
    #[must_use]
    pub fn mention(&self, type_name: &str) -> Option<String> {
        self.first(type_name)
            .and_then(|e| e.mention_text.as_deref())
            .filter(|text| !text.is_empty())
            .map(str::to_owned)
    }

    /// Mention texts of every entity of the given type, in service order
    ///
    /// # Errors
    /// Returns an error when any matching entity lacks a mention text; a
    /// repeated evidence entity without one is a broken upstream contract.
    pub fn mentions_strict(&self, type_name: &str) -> Result<Vec<String>> {
        self.entities
            .iter()
            .filter(|e| e.entity_type == type_name)
            .map(|e| {
                e.mention_text
                    .as_deref()
                    .filter(|text| !text.is_empty())
                    .map(str::to_owned)
                    .ok_or_else(|| ExtractionError::MissingMentionText(type_name.to_owned()))
            })
            .collect()
    }
}

/// Crop and base64-encode the portrait when the response anchors one
///
/// No `Portrait` entity means no portrait on the document: `Ok(None)`. A
/// `Portrait` entity missing any piece of its anchor chain is a broken
/// upstream contract. The page number is validated as an integer but not
/// otherwise used.
fn portrait_image(index: &EntityIndex<'_>, image: &[u8], mime_type: &str) -> Result<Option<String>> {
    let Some(entity) = index.first(PORTRAIT) else {
        return Ok(None);
    };

    if entity.confidence.is_none() {
        return Err(ExtractionError::PortraitField("confidence"));
    }

    let anchor = entity
        .page_anchor
        .as_ref()
        .ok_or(ExtractionError::PortraitField("page anchor"))?;
    let page_ref = anchor
        .page_refs
        .as_deref()
        .and_then(|refs| refs.first())
        .ok_or(ExtractionError::PortraitField("page refs"))?;

    let page = page_ref
        .page
        .as_deref()
        .ok_or(ExtractionError::PortraitField("page"))?;
    page.parse::<i64>()
        .map_err(|_| ExtractionError::PageNumber(page.to_owned()))?;

    let vertices = page_ref
        .bounding_poly
        .as_ref()
        .ok_or(ExtractionError::PortraitField("bounding polygon"))?
        .normalized_vertices
        .as_deref()
        .ok_or(ExtractionError::PortraitField("normalized vertices"))?;

    debug!("Cropping portrait from {} vertex anchor", vertices.len());
    let cropped = id_doc_portrait::crop_region(image, mime_type, vertices)?;

    Ok(Some(BASE64.encode(cropped)))
}

/// Normalize a driver's-license extraction response
///
/// # Errors
/// Returns an error when a present `Portrait` entity is structurally
/// incomplete or the crop fails.
pub fn driver_license(
    entities: &[Entity],
    image: &[u8],
    mime_type: &str,
) -> Result<DriverLicenseRecord> {
    let index = EntityIndex::new(entities);

    Ok(DriverLicenseRecord {
        address: index.mention(ADDRESS),
        date_of_birth: index.mention(DATE_OF_BIRTH),
        document_id: index.mention(DOCUMENT_ID),
        expiration_date: index.mention(EXPIRATION_DATE),
        family_name: index.mention(FAMILY_NAME),
        given_names: index.mention(GIVEN_NAMES),
        issue_date: index.mention(ISSUE_DATE),
        portrait_image: portrait_image(&index, image, mime_type)?,
    })
}

/// Normalize a passport extraction response
///
/// # Errors
/// Returns an error when a present `Portrait` entity is structurally
/// incomplete or the crop fails.
pub fn passport(entities: &[Entity], image: &[u8], mime_type: &str) -> Result<PassportRecord> {
    let index = EntityIndex::new(entities);

    Ok(PassportRecord {
        address: index.mention(ADDRESS),
        date_of_birth: index.mention(DATE_OF_BIRTH),
        document_id: index.mention(DOCUMENT_ID),
        expiration_date: index.mention(EXPIRATION_DATE),
        family_name: index.mention(FAMILY_NAME),
        given_names: index.mention(GIVEN_NAMES),
        issue_date: index.mention(ISSUE_DATE),
        mrz_code: index.mention(MRZ_CODE),
        portrait_image: portrait_image(&index, image, mime_type)?,
    })
}

/// Normalize a patent extraction response
#[must_use]
pub fn patent(entities: &[Entity]) -> PatentRecord {
    let index = EntityIndex::new(entities);

    PatentRecord {
        applicant_line1: index.mention(APPLICANT_LINE_1),
        application_number: index.mention(APPLICATION_NUMBER),
        class_international: index.mention(CLASS_INTERNATIONAL),
        class_us: index.mention(CLASS_US),
        filing_date: index.mention(FILING_DATE),
        inventor_line1: index.mention(INVENTOR_LINE_1),
        issuer: index.mention(ISSUER),
        patent_number: index.mention(PATENT_NUMBER),
        publication_date: index.mention(PUBLICATION_DATE),
        title_line1: index.mention(TITLE_LINE_1),
    }
}

/// Normalize an identity-proofing extraction response
///
/// # Errors
/// Returns an error when a repeated evidence entity lacks its mention text.
pub fn id_proofing(entities: &[Entity]) -> Result<IdProofingRecord> {
    let index = EntityIndex::new(entities);

    Ok(IdProofingRecord {
        fraud_signals_is_identity_document: index.mention(FRAUD_SIGNALS_IS_IDENTITY_DOCUMENT),
        fraud_signals_suspicious_words: index.mention(FRAUD_SIGNALS_SUSPICIOUS_WORDS),
        evidence_suspicious_word: index.mentions_strict(EVIDENCE_SUSPICIOUS_WORD)?,
        evidence_inconclusive_suspicious_word: index
            .mentions_strict(EVIDENCE_INCONCLUSIVE_SUSPICIOUS_WORD)?,
        fraud_signals_image_manipulation: index.mention(FRAUD_SIGNALS_IMAGE_MANIPULATION),
        fraud_signals_online_duplicate: index.mention(FRAUD_SIGNALS_ONLINE_DUPLICATE),
        evidence_hostname: index.mentions_strict(EVIDENCE_HOSTNAME)?,
        evidence_thumbnail_url: index.mentions_strict(EVIDENCE_THUMBNAIL_URL)?,
    })
}
