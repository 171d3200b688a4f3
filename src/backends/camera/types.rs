// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use crate::constants::capture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Camera backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CameraBackendType {
    /// Video4Linux2 capture devices
    #[default]
    V4l2,
    /// A fixed image served as if it were a camera
    StillImage,
}

impl std::fmt::Display for CameraBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraBackendType::V4l2 => write!(f, "V4L2"),
            CameraBackendType::StillImage => write!(f, "still image"),
        }
    }
}

impl std::str::FromStr for CameraBackendType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v4l2" => Ok(CameraBackendType::V4l2),
            "still" | "still-image" | "still_image" => Ok(CameraBackendType::StillImage),
            other => Err(format!("Unknown camera backend '{}'", other)),
        }
    }
}

/// Which way the requested camera should face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    /// Rear camera, pointing at the ingredients
    #[default]
    Environment,
    /// Front camera
    User,
}

/// A capture device as reported by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub name: String,
    /// Device path or backend-specific identifier
    pub path: String,
    /// "front", "back", or "external" when the backend knows
    pub location: Option<String>,
}

impl CameraDevice {
    /// Whether this device plausibly serves the requested facing mode
    pub fn matches_facing(&self, facing: FacingMode) -> bool {
        let hints: &[&str] = match facing {
            FacingMode::Environment => &["back", "rear", "environment", "world"],
            FacingMode::User => &["front", "user", "face"],
        };
        let location = self.location.as_deref().unwrap_or_default().to_lowercase();
        let name = self.name.to_lowercase();
        hints
            .iter()
            .any(|hint| location.contains(hint) || name.contains(hint))
    }
}

/// A decoded video frame in tightly-packed or strided RGBA
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA pixels
    pub data: Arc<[u8]>,
    /// Bytes per row, may include padding
    pub stride: u32,
    /// When the frame was captured
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Build a frame from tightly-packed RGBA data
    pub fn from_rgba(width: u32, height: u32, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            width,
            height,
            data: data.into(),
            stride: width * 4,
            captured_at: Instant::now(),
        }
    }

    /// Copy the pixels into a contiguous buffer without row padding
    pub fn packed_rgba(&self) -> Vec<u8> {
        let row_bytes = self.width as usize * 4;
        let stride = self.stride as usize;
        if stride == row_bytes {
            return self.data.to_vec();
        }

        let mut packed = Vec::with_capacity(row_bytes * self.height as usize);
        for row in self.data.chunks(stride).take(self.height as usize) {
            packed.extend_from_slice(&row[..row_bytes.min(row.len())]);
        }
        packed
    }
}

/// Live preview binding for an active stream
///
/// Mirrors what a video element reports: the stream's intrinsic size, with
/// zero meaning "not known yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size of the off-screen raster a capture renders into
    pub fn raster_size(&self) -> (u32, u32) {
        let width = if self.width > 0 {
            self.width
        } else {
            capture::FALLBACK_WIDTH
        };
        let height = if self.height > 0 {
            self.height
        } else {
            capture::FALLBACK_HEIGHT
        };
        (width, height)
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Backend errors
#[derive(Debug, Clone)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Camera device not found
    DeviceNotFound(String),
    /// Device exists but refused to stream (busy, permission denied)
    DeviceBusy(String),
    /// Format not supported
    FormatNotSupported(String),
    /// General I/O error
    IoError(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::DeviceBusy(msg) => write!(f, "Device busy: {}", msg),
            BackendError::FormatNotSupported(msg) => write!(f, "Format not supported: {}", msg),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => BackendError::DeviceNotFound(err.to_string()),
            std::io::ErrorKind::PermissionDenied => BackendError::DeviceBusy(err.to_string()),
            _ => BackendError::IoError(err.to_string()),
        }
    }
}
