// SPDX-License-Identifier: GPL-3.0-only

//! Still photo encoding
//!
//! Captured stills are uploaded, never written to disk, so JPEG is the only
//! output format.

use super::processing::ProcessedImage;
use tracing::debug;

/// Encoded image data ready for upload
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    /// File extension for the encoded data
    pub fn extension(&self) -> &'static str {
        "jpg"
    }

    /// Mime type for the encoded data
    pub fn mime(&self) -> &'static str {
        "image/jpeg"
    }
}

/// JPEG encoder for captured stills
pub struct PhotoEncoder {
    quality: u8,
}

impl PhotoEncoder {
    /// Create an encoder; quality is clamped to 1-100
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode a processed image as JPEG
    pub fn encode(&self, processed: &ProcessedImage) -> Result<EncodedImage, String> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);

        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, self.quality);

        encoder
            .encode(
                processed.image.as_raw(),
                processed.width,
                processed.height,
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| format!("JPEG encoding failed: {}", e))?;

        debug!(size = buffer.len(), quality = self.quality, "Encoding complete");

        Ok(EncodedImage {
            data: buffer,
            width: processed.width,
            height: processed.height,
        })
    }
}
