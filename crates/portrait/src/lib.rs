//! Portrait cropping from normalized bounding polygons
//!
//! The document-understanding service anchors a detected portrait with a
//! 4-vertex polygon whose corners are fractions (0..1) of the source image
//! dimensions, ordered top-left, top-right, bottom-right, bottom-left. This
//! crate converts that polygon into an absolute pixel rectangle, crops the
//! source image, and re-encodes the crop in the original MIME type.
//!
//! # Example
//! ```no_run
//! use id_doc_docai::NormalizedVertex;
//! use id_doc_portrait::crop_region;
//!
//! # fn main() -> Result<(), id_doc_portrait::CropError> {
//! let image_bytes = std::fs::read("license.png").unwrap();
//! let vertices = [
//!     NormalizedVertex::new(0.1, 0.1),
//!     NormalizedVertex::new(0.4, 0.1),
//!     NormalizedVertex::new(0.4, 0.5),
//!     NormalizedVertex::new(0.1, 0.5),
//! ];
//!
//! let portrait = crop_region(&image_bytes, "image/png", &vertices)?;
//! # Ok(())
//! # }
//! ```

use id_doc_common::ExtractionError;
use image::ImageFormat;
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

use id_doc_docai::NormalizedVertex;

/// Portrait cropping errors
#[derive(Debug, Error)]
pub enum CropError {
    #[error("bounding polygon must have exactly 4 vertices, got {0}")]
    VertexCount(usize),

    #[error("vertex {index} is missing its {axis} coordinate")]
    MissingCoordinate { index: usize, axis: &'static str },

    #[error("unsupported image MIME type: {0}")]
    UnsupportedMimeType(String),

    #[error("crop region is empty: {width:.0}x{height:.0}")]
    EmptyRegion { width: f64, height: f64 },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl From<CropError> for ExtractionError {
    fn from(err: CropError) -> Self {
        ExtractionError::Crop(err.to_string())
    }
}

/// Whether a MIME type maps to an image format we can decode and re-encode
#[must_use]
pub fn supported_mime_type(mime_type: &str) -> bool {
    ImageFormat::from_mime_type(mime_type).is_some()
}

/// Crop the region described by a normalized 4-vertex polygon
///
/// The returned bytes are encoded in the same format as the input, derived
/// from `mime_type`. The rectangle is computed from the top-left, top-right,
/// and bottom-right vertices and clamped to the image bounds; a polygon that
/// produces a non-positive width or height is rejected.
///
/// # Errors
/// Returns an error if the polygon does not have exactly 4 vertices, any
/// vertex is missing a coordinate, the MIME type is unsupported, the region
/// is empty, or the image cannot be decoded or re-encoded.
pub fn crop_region(
    image_bytes: &[u8],
    mime_type: &str,
    vertices: &[NormalizedVertex],
) -> Result<Vec<u8>, CropError> {
    if vertices.len() != 4 {
        return Err(CropError::VertexCount(vertices.len()));
    }

    let mut corners = [(0.0f64, 0.0f64); 4];
    for (index, vertex) in vertices.iter().enumerate() {
        let x = vertex
            .x
            .ok_or(CropError::MissingCoordinate { index, axis: "x" })?;
        let y = vertex
            .y
            .ok_or(CropError::MissingCoordinate { index, axis: "y" })?;
        corners[index] = (f64::from(x), f64::from(y));
    }

    let format = ImageFormat::from_mime_type(mime_type)
        .ok_or_else(|| CropError::UnsupportedMimeType(mime_type.to_string()))?;

    let image = image::load_from_memory_with_format(image_bytes, format)?;
    let image_width = f64::from(image.width());
    let image_height = f64::from(image.height());

    // Vertex order: top-left(0), top-right(1), bottom-right(2), bottom-left(3)
    let left = image_width * corners[0].0;
    let top = image_height * corners[0].1;
    let width = image_width * corners[1].0 - left;
    let height = image_height * corners[2].1 - top;

    if width <= 0.0 || height <= 0.0 {
        return Err(CropError::EmptyRegion { width, height });
    }

    let x = left.clamp(0.0, image_width - 1.0) as u32;
    let y = top.clamp(0.0, image_height - 1.0) as u32;
    let crop_width = (width as u32).clamp(1, image.width() - x);
    let crop_height = (height as u32).clamp(1, image.height() - y);

    debug!(
        "Cropping {}x{} region at ({}, {}) from {}x{} image",
        crop_width,
        crop_height,
        x,
        y,
        image.width(),
        image.height()
    );

    let cropped = image.crop_imm(x, y, crop_width, crop_height);

    let mut buffer = Vec::new();
    cropped.write_to(&mut Cursor::new(&mut buffer), format)?;

    Ok(buffer)
}
