// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Detection/generation endpoint used when no configuration overrides it
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/detect_and_generate";

/// Multipart field name carrying the image payload
pub const UPLOAD_FIELD_NAME: &str = "file";

/// Error detail recorded when the endpoint gave no usable message
pub const GENERIC_TRANSPORT_MESSAGE: &str = "Network error";

/// Upload size limit advertised to users (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Capture surface constants
pub mod capture {
    /// Raster width when the stream does not report its native resolution
    pub const FALLBACK_WIDTH: u32 = 1280;
    /// Raster height when the stream does not report its native resolution
    pub const FALLBACK_HEIGHT: u32 = 720;
    /// JPEG quality for captured stills (0-100)
    pub const DEFAULT_JPEG_QUALITY: u8 = 92;
    /// Filename prefix for captured stills
    pub const FILENAME_PREFIX: &str = "capture";
    /// Number of mmap buffers requested from V4L2 devices
    pub const V4L2_BUFFER_COUNT: u32 = 4;
}

/// Supported file formats
pub mod file_formats {
    /// Supported image file extensions
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

    /// Check if a file extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }

    /// Mime type for a supported image extension
    pub fn mime_for_extension(ext: &str) -> &'static str {
        match ext.to_lowercase().as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
    }
}
