//! Extraction response normalization for US identity documents
//!
//! The document-understanding service returns a loosely-typed list of named
//! entities. This crate reshapes that list into strict per-document-type
//! result records:
//!
//! - every result field is `None` exactly when no entity of the matching
//!   type (with a usable mention text) came back
//! - scalar fields take the first matching entity in service order
//! - repeated evidence fields collect every match, in order, and treat a
//!   match without mention text as an upstream contract violation
//! - driver's licenses and passports get the portrait region cropped out of
//!   the source image when a `Portrait` entity is anchored to one
//!
//! [`DocumentService`] ties the pieces together: one remote call per
//! request, then synchronous normalization (moved off the async workers when
//! it involves image work).

pub mod normalize;
pub mod records;
mod service;

pub use normalize::{document_entities, EntityIndex};
pub use records::{DriverLicenseRecord, IdProofingRecord, PassportRecord, PatentRecord};
pub use service::{DocumentService, Processors};
