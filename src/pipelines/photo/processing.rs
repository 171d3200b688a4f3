// SPDX-License-Identifier: GPL-3.0-only

//! Frame rasterization
//!
//! Draws a live frame onto an off-screen RGB raster of the requested size,
//! scaling when the frame and raster disagree.

use crate::backends::camera::types::CameraFrame;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage, RgbaImage};
use tracing::debug;

/// Rasterized still, ready for encoding
pub struct ProcessedImage {
    pub image: RgbImage,
    pub width: u32,
    pub height: u32,
}

/// Render `frame` into a `width` x `height` RGB raster
pub fn render_to_raster(
    frame: &CameraFrame,
    width: u32,
    height: u32,
) -> Result<ProcessedImage, String> {
    if frame.width == 0 || frame.height == 0 {
        return Err("Frame has no pixels".to_string());
    }

    let rgba = RgbaImage::from_raw(frame.width, frame.height, frame.packed_rgba())
        .ok_or_else(|| {
            format!(
                "Frame data does not match {}x{} RGBA",
                frame.width, frame.height
            )
        })?;

    let raster = if (frame.width, frame.height) == (width, height) {
        rgba
    } else {
        debug!(
            from_width = frame.width,
            from_height = frame.height,
            width,
            height,
            "Scaling frame to raster"
        );
        image::imageops::resize(&rgba, width, height, FilterType::Triangle)
    };

    Ok(ProcessedImage {
        image: DynamicImage::ImageRgba8(raster).to_rgb8(),
        width,
        height,
    })
}
