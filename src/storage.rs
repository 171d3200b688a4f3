// SPDX-License-Identifier: GPL-3.0-only

//! Loading user-selected image files

use crate::constants::file_formats;
use crate::errors::{AppError, AppResult};
use crate::media::SourceImage;
use std::path::Path;
use tracing::{debug, info};

/// Read an image file from disk as a [`SourceImage`]
///
/// Only supported image extensions are accepted and files larger than
/// `max_bytes` are rejected before their contents are read.
pub async fn load_source_image(path: &Path, max_bytes: u64) -> AppResult<SourceImage> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !file_formats::is_image_extension(&extension) {
        return Err(AppError::Storage(format!(
            "Unsupported image format: '{}'",
            path.display()
        )));
    }

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| AppError::Storage(format!("Cannot read '{}': {}", path.display(), e)))?;

    if metadata.len() > max_bytes {
        return Err(AppError::Storage(format!(
            "'{}' is {} bytes, the limit is {} bytes",
            path.display(),
            metadata.len(),
            max_bytes
        )));
    }

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::Storage(format!("Cannot read '{}': {}", path.display(), e)))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("upload.{}", extension));

    debug!(path = %path.display(), bytes = bytes.len(), "Image file read");
    info!(name = %name, "Loaded image for submission");

    Ok(SourceImage::new(
        name,
        file_formats::mime_for_extension(&extension),
        bytes,
    ))
}
