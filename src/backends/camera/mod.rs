// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │    Orchestrator     │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ MediaCaptureSession │  ← Single-owner stream lifecycle, still capture
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend Trait│  ← Device enumeration, stream acquisition
//! └──────────┬──────────┘
//!            │
//!       ┌────┴────────┐
//!       ▼             ▼
//!   ┌──────┐   ┌─────────────┐
//!   │ V4L2 │   │ Still image │
//!   └──────┘   └─────────────┘
//! ```

pub mod format_converters;
pub mod session;
pub mod still_image;
pub mod types;
pub mod v4l2;

pub use session::MediaCaptureSession;
pub use still_image::StillImageBackend;
pub use types::*;
pub use v4l2::V4l2Backend;

use crate::config::Config;

/// A source of camera streams
pub trait CameraBackend: Send {
    /// Enumerate available cameras on this backend
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Acquire a live stream from the camera best matching `facing`
    ///
    /// The returned stream owns the device until [`DeviceStream::stop`] is
    /// called or it is dropped.
    fn open_stream(&mut self, facing: FacingMode) -> BackendResult<Box<dyn DeviceStream>>;

    /// Get the backend type identifier
    fn backend_type(&self) -> CameraBackendType;
}

/// A live stream owned by exactly one session
pub trait DeviceStream: Send {
    /// Native stream resolution, if the device reported one
    fn native_resolution(&self) -> Option<(u32, u32)>;

    /// Most recent decoded frame
    fn latest_frame(&self) -> Option<CameraFrame>;

    /// Release every underlying track. Idempotent.
    fn stop(&mut self);

    /// Whether the stream still holds its device
    fn is_live(&self) -> bool;
}

/// Build the backend selected in the configuration
pub fn get_backend(config: &Config) -> Box<dyn CameraBackend> {
    match config.camera_backend {
        CameraBackendType::V4l2 => Box::new(V4l2Backend::new(config.camera_device.clone())),
        CameraBackendType::StillImage => {
            Box::new(StillImageBackend::new(config.still_image_path.clone()))
        }
    }
}
