// SPDX-License-Identifier: GPL-3.0-only

//! Still photo pipeline
//!
//! ```text
//! Live frame (RGBA) → Raster (viewport size, RGB) → JPEG → SourceImage
//! ```
//!
//! Runs synchronously: a still is small and capture is a direct user action,
//! so the result is staged before control returns to the caller.

pub mod encoding;
pub mod processing;

pub use encoding::{EncodedImage, PhotoEncoder};
pub use processing::{ProcessedImage, render_to_raster};

use crate::backends::camera::types::{CameraFrame, Viewport};
use crate::constants::capture::FILENAME_PREFIX;
use crate::media::SourceImage;
use tracing::info;

/// Frame → still image pipeline
pub struct PhotoPipeline {
    encoder: PhotoEncoder,
}

impl PhotoPipeline {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            encoder: PhotoEncoder::new(jpeg_quality),
        }
    }

    /// Render `frame` into a raster sized by `viewport` and encode it
    pub fn capture_still(
        &self,
        frame: &CameraFrame,
        viewport: &Viewport,
    ) -> Result<SourceImage, String> {
        let (width, height) = viewport.raster_size();
        let processed = render_to_raster(frame, width, height)?;
        let encoded = self.encoder.encode(&processed)?;

        let name = format!(
            "{}-{}.{}",
            FILENAME_PREFIX,
            chrono::Utc::now().timestamp_millis(),
            encoded.extension()
        );
        info!(name = %name, width, height, bytes = encoded.data.len(), "Still captured");

        Ok(SourceImage::new(name, encoded.mime(), encoded.data))
    }
}
