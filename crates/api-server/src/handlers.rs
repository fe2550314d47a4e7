//! HTTP request handlers for API endpoints

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{error, info};

use id_doc_common::ExtractionError;

use crate::ApiState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// A single file pulled out of a multipart upload
struct UploadedFile {
    bytes: Bytes,
    mime_type: String,
}

/// Read exactly one uploaded file from a multipart request
///
/// The remote processor is never called for malformed uploads: zero parts,
/// more than one part, a part without a content type, and a part with empty
/// content are all client errors.
async fn read_single_upload(
    multipart: &mut Multipart,
) -> Result<UploadedFile, (StatusCode, String)> {
    let mut upload: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Malformed multipart request: {e}"),
        )
    })? {
        if upload.is_some() {
            return Err((
                StatusCode::BAD_REQUEST,
                "A single file must be uploaded".to_string(),
            ));
        }

        let mime_type = field.content_type().map(str::to_owned).ok_or((
            StatusCode::BAD_REQUEST,
            "The uploaded file must declare a content type".to_string(),
        ))?;

        let bytes = field.bytes().await.map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to read uploaded file: {e}"),
            )
        })?;

        upload = Some(UploadedFile { bytes, mime_type });
    }

    let upload = upload.ok_or((
        StatusCode::BAD_REQUEST,
        "No files were uploaded".to_string(),
    ))?;

    if upload.bytes.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "The uploaded file has no content".to_string(),
        ));
    }

    Ok(upload)
}

/// Reject uploads the portrait cropper cannot re-encode
///
/// Only the portrait-bearing endpoints enforce this; the patent and
/// id-proofing processors accept formats we never need to decode locally.
fn ensure_croppable(mime_type: &str) -> Result<(), (StatusCode, String)> {
    if id_doc_portrait::supported_mime_type(mime_type) {
        Ok(())
    } else {
        Err((
            StatusCode::BAD_REQUEST,
            format!("Unsupported image content type: {mime_type}"),
        ))
    }
}

/// Map extraction failures onto the gateway boundary
///
/// Everything the service returns at this point is an upstream-side failure
/// (transport error or broken extraction contract), so it surfaces as 502.
fn extraction_error(err: &ExtractionError) -> (StatusCode, String) {
    error!("Extraction failed: {err}");
    (StatusCode::BAD_GATEWAY, err.to_string())
}

/// Parse a US driver's license upload
pub async fn parse_driver_license(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let upload = read_single_upload(&mut multipart).await?;
    ensure_croppable(&upload.mime_type)?;

    info!(
        "Driver's license parse request ({} bytes, {})",
        upload.bytes.len(),
        upload.mime_type
    );

    let record = state
        .service
        .parse_driver_license(upload.bytes.to_vec(), upload.mime_type)
        .await
        .map_err(|e| extraction_error(&e))?;

    Ok(Json(record))
}

/// Parse a US passport upload
pub async fn parse_passport(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let upload = read_single_upload(&mut multipart).await?;
    ensure_croppable(&upload.mime_type)?;

    info!(
        "Passport parse request ({} bytes, {})",
        upload.bytes.len(),
        upload.mime_type
    );

    let record = state
        .service
        .parse_passport(upload.bytes.to_vec(), upload.mime_type)
        .await
        .map_err(|e| extraction_error(&e))?;

    Ok(Json(record))
}

/// Run identity-proofing over an uploaded document scan
pub async fn id_proof(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let upload = read_single_upload(&mut multipart).await?;

    info!(
        "Identity-proofing request ({} bytes, {})",
        upload.bytes.len(),
        upload.mime_type
    );

    let record = state
        .service
        .id_proof(upload.bytes.to_vec(), upload.mime_type)
        .await
        .map_err(|e| extraction_error(&e))?;

    Ok(Json(record))
}

/// Parse a US patent upload
pub async fn parse_patent(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let upload = read_single_upload(&mut multipart).await?;

    info!(
        "Patent parse request ({} bytes, {})",
        upload.bytes.len(),
        upload.mime_type
    );

    let record = state
        .service
        .parse_patent(upload.bytes.to_vec(), upload.mime_type)
        .await
        .map_err(|e| extraction_error(&e))?;

    Ok(Json(record))
}
