// SPDX-License-Identifier: GPL-3.0-only

//! Camera handlers
//!
//! Camera failures are returned to the caller for a user notice. They never
//! touch the gallery, and a failed capture leaves the staging slot empty.

use crate::app::Orchestrator;
use crate::backends::camera::Viewport;
use crate::errors::CameraError;
use tracing::{info, warn};

impl Orchestrator {
    // =========================================================================
    // Camera Handlers
    // =========================================================================

    /// Start the camera for live preview
    ///
    /// Restarts cleanly if the camera is already running.
    pub fn start_camera(&mut self) -> Result<Viewport, CameraError> {
        self.camera.start().inspect_err(|e| {
            warn!(error = %e, notice = e.user_notice(), "Camera unavailable");
        })
    }

    pub fn stop_camera(&mut self) {
        self.camera.stop();
    }

    /// Grab the live frame and stage it as a new image
    ///
    /// The camera is stopped once the still is staged. On failure the camera
    /// keeps running so the user can retry.
    pub fn capture_and_stage(&mut self) -> Result<(), CameraError> {
        let viewport = self
            .camera
            .viewport()
            .ok_or_else(|| CameraError::CaptureFailed("Camera is not active".to_string()))?;

        let still = self.camera.capture_frame(&viewport).inspect_err(|e| {
            warn!(error = %e, "Capture failed");
        })?;

        info!(name = still.name(), size = still.len(), "Captured still");
        self.staging.stage_new(still, &mut self.registry);
        self.camera.stop();
        Ok(())
    }
}
