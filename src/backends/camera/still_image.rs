// SPDX-License-Identifier: GPL-3.0-only

//! Still-image camera backend
//!
//! Serves a single image as a never-changing camera stream. Useful on
//! machines without a camera and for exercising the capture flow in tests.

use super::types::{
    BackendError, BackendResult, CameraBackendType, CameraDevice, CameraFrame, FacingMode,
};
use super::{CameraBackend, DeviceStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Where the backend gets its frame from
#[derive(Debug, Clone)]
enum FrameSource {
    /// Nothing configured: behaves like a machine without a camera
    None,
    /// Decoded from an image file on every stream open
    File(PathBuf),
    /// Supplied in memory
    Frame(CameraFrame),
}

/// Camera backend backed by a single image
#[derive(Debug, Clone)]
pub struct StillImageBackend {
    source: FrameSource,
    reports_resolution: bool,
    live_streams: Arc<AtomicUsize>,
}

impl StillImageBackend {
    /// Backend serving the image at `path`, or no camera at all when `None`
    pub fn new(path: Option<PathBuf>) -> Self {
        let source = match path {
            Some(path) => FrameSource::File(path),
            None => FrameSource::None,
        };
        Self {
            source,
            reports_resolution: true,
            live_streams: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Backend serving an in-memory frame
    pub fn from_frame(frame: CameraFrame) -> Self {
        Self {
            source: FrameSource::Frame(frame),
            reports_resolution: true,
            live_streams: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Backend with no camera: every open fails
    pub fn unavailable() -> Self {
        Self::new(None)
    }

    /// Make streams report an unknown native resolution
    pub fn without_resolution_metadata(mut self) -> Self {
        self.reports_resolution = false;
        self
    }

    /// Counter of streams opened and not yet stopped
    pub fn live_stream_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.live_streams)
    }

    fn load_frame(&self) -> BackendResult<CameraFrame> {
        match &self.source {
            FrameSource::None => Err(BackendError::NotAvailable(
                "No still image configured".to_string(),
            )),
            FrameSource::File(path) => load_image_as_frame(path),
            FrameSource::Frame(frame) => Ok(CameraFrame {
                captured_at: Instant::now(),
                ..frame.clone()
            }),
        }
    }
}

impl CameraBackend for StillImageBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        let path = match &self.source {
            FrameSource::None => return Vec::new(),
            FrameSource::File(path) => path.display().to_string(),
            FrameSource::Frame(_) => "memory".to_string(),
        };
        vec![CameraDevice {
            name: "Still image".to_string(),
            path,
            location: Some("external".to_string()),
        }]
    }

    fn open_stream(&mut self, facing: FacingMode) -> BackendResult<Box<dyn DeviceStream>> {
        let frame = self.load_frame()?;
        debug!(?facing, width = frame.width, height = frame.height, "Opening still image stream");

        self.live_streams.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(StillImageStream {
            frame,
            reports_resolution: self.reports_resolution,
            live: true,
            live_streams: Arc::clone(&self.live_streams),
        }))
    }

    fn backend_type(&self) -> CameraBackendType {
        CameraBackendType::StillImage
    }
}

struct StillImageStream {
    frame: CameraFrame,
    reports_resolution: bool,
    live: bool,
    live_streams: Arc<AtomicUsize>,
}

impl DeviceStream for StillImageStream {
    fn native_resolution(&self) -> Option<(u32, u32)> {
        self.reports_resolution
            .then_some((self.frame.width, self.frame.height))
    }

    fn latest_frame(&self) -> Option<CameraFrame> {
        self.live.then(|| self.frame.clone())
    }

    fn stop(&mut self) {
        if self.live {
            self.live = false;
            self.live_streams.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

impl Drop for StillImageStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Decode an image file into an RGBA frame
pub fn load_image_as_frame(path: &Path) -> BackendResult<CameraFrame> {
    info!(path = %path.display(), "Loading image file");

    let img = image::open(path).map_err(|e| {
        BackendError::DeviceNotFound(format!("Failed to load image '{}': {}", path.display(), e))
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(CameraFrame::from_rgba(width, height, rgba.into_raw()))
}
