// SPDX-License-Identifier: GPL-3.0-only

//! Camera session lifecycle
//!
//! The session is the only owner of a device stream. It acquires one on
//! [`MediaCaptureSession::start`], exposes it for preview while active, turns
//! the current frame into a still on demand, and releases it on
//! [`MediaCaptureSession::stop`] or drop.

use super::types::{CameraBackendType, CameraDevice, CameraFrame, FacingMode, Viewport};
use super::{CameraBackend, DeviceStream};
use crate::errors::CameraError;
use crate::media::SourceImage;
use crate::pipelines::photo::PhotoPipeline;
use tracing::{info, warn};

/// Owns the camera stream between start and stop
pub struct MediaCaptureSession {
    backend: Box<dyn CameraBackend>,
    stream: Option<Box<dyn DeviceStream>>,
    facing: FacingMode,
    photo_pipeline: PhotoPipeline,
}

impl MediaCaptureSession {
    /// Create an inactive session on top of `backend`
    pub fn new(backend: Box<dyn CameraBackend>, jpeg_quality: u8) -> Self {
        info!(backend = %backend.backend_type(), "Creating capture session");
        Self {
            backend,
            stream: None,
            facing: FacingMode::Environment,
            photo_pipeline: PhotoPipeline::new(jpeg_quality),
        }
    }

    /// Request a different facing mode for the next start
    pub fn set_facing(&mut self, facing: FacingMode) {
        self.facing = facing;
    }

    pub fn backend_type(&self) -> CameraBackendType {
        self.backend.backend_type()
    }

    /// Cameras the backend can see
    pub fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        self.backend.enumerate_cameras()
    }

    /// Acquire a stream and become active
    ///
    /// A session that is already active is stopped first so the previous
    /// device handle is never orphaned. On failure the session stays inactive.
    pub fn start(&mut self) -> Result<Viewport, CameraError> {
        if self.stream.is_some() {
            warn!("Camera session already active, restarting");
            self.stop();
        }

        let stream = self.backend.open_stream(self.facing).map_err(|e| {
            warn!(error = %e, "Camera stream request denied");
            CameraError::from(e)
        })?;

        let viewport = viewport_for(stream.as_ref());
        info!(
            width = viewport.width,
            height = viewport.height,
            facing = ?self.facing,
            "Camera session started"
        );
        self.stream = Some(stream);
        Ok(viewport)
    }

    pub fn is_active(&self) -> bool {
        self.stream.as_ref().is_some_and(|s| s.is_live())
    }

    /// Preview binding of the live stream
    pub fn viewport(&self) -> Option<Viewport> {
        self.stream.as_deref().map(|s| viewport_for(s))
    }

    /// Current live frame for display
    pub fn latest_frame(&self) -> Option<CameraFrame> {
        self.stream.as_ref().and_then(|s| s.latest_frame())
    }

    /// Grab the current frame as an encoded still
    pub fn capture_frame(&self, viewport: &Viewport) -> Result<SourceImage, CameraError> {
        let stream = self
            .stream
            .as_ref()
            .filter(|s| s.is_live())
            .ok_or_else(|| CameraError::CaptureFailed("Camera is not active".to_string()))?;

        let frame = stream
            .latest_frame()
            .ok_or_else(|| CameraError::CaptureFailed("No frame available".to_string()))?;

        self.photo_pipeline
            .capture_still(&frame, viewport)
            .map_err(CameraError::CaptureFailed)
    }

    /// Release the device. Safe to call when inactive.
    pub fn stop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            info!("Camera session stopped");
        }
    }
}

impl Drop for MediaCaptureSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for MediaCaptureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaCaptureSession")
            .field("backend", &self.backend.backend_type())
            .field("active", &self.is_active())
            .field("facing", &self.facing)
            .finish()
    }
}

fn viewport_for(stream: &dyn DeviceStream) -> Viewport {
    stream
        .native_resolution()
        .map(|(width, height)| Viewport::new(width, height))
        .unwrap_or_default()
}
