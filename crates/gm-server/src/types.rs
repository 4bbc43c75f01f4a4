//! Core data types shared by the server and the processing pipeline.

use bytes::Bytes;

/// An encoded image and its format.
///
/// `data` is a shared buffer, so returning a source image unchanged is a
/// reference-count bump rather than a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Format identifier ("jpeg", "png", "webp", etc.)
    pub format: String,

    /// Encoded image bytes
    pub data: Bytes,
}

impl Image {
    pub fn new(format: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            format: format.into(),
            data: data.into(),
        }
    }
}

/// Whether a format identifier names JPEG.
pub fn is_jpeg_format(format: &str) -> bool {
    matches!(format, "jpeg" | "jpg")
}
