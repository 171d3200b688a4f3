// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the recipe client
//!
//! Per-item detection failures never escalate: they are folded into the
//! item's `Error` status. Camera errors are returned to the caller so it can
//! surface a notice; they never touch gallery state.

use crate::backends::camera::types::BackendError;
use crate::constants::GENERIC_TRANSPORT_MESSAGE;
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera acquisition or capture errors
    Camera(CameraError),
    /// Detection/generation endpoint errors
    Detection(DetectionError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Camera session errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// Permission denied, no device, or the device refused to stream
    DeviceUnavailable(String),
    /// No frame could be grabbed or encoded
    CaptureFailed(String),
}

impl CameraError {
    /// Short message suitable for a user-visible notice
    pub fn user_notice(&self) -> &'static str {
        match self {
            CameraError::DeviceUnavailable(_) => "Camera access denied or unavailable.",
            CameraError::CaptureFailed(_) => "Could not capture a photo. Please try again.",
        }
    }
}

/// Failure of a single detection/generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionError {
    /// The endpoint answered with an `error` field
    Service(String),
    /// Connection refused, timeout, non-2xx status
    Transport(String),
    /// The body could not be interpreted as a recipe or an error
    Malformed(String),
}

impl DetectionError {
    /// Message recorded on the gallery item
    ///
    /// Service messages are kept verbatim; everything else collapses to the
    /// generic transport message.
    pub fn user_message(&self) -> String {
        match self {
            DetectionError::Service(msg) if !msg.trim().is_empty() => msg.clone(),
            _ => GENERIC_TRANSPORT_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Detection(e) => write!(f, "Detection error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::DeviceUnavailable(msg) => write!(f, "Camera unavailable: {}", msg),
            CameraError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
        }
    }
}

impl fmt::Display for DetectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionError::Service(msg) => write!(f, "Service error: {}", msg),
            DetectionError::Transport(msg) => write!(f, "Transport error: {}", msg),
            DetectionError::Malformed(msg) => write!(f, "Malformed response: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for DetectionError {}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<DetectionError> for AppError {
    fn from(err: DetectionError) -> Self {
        AppError::Detection(err)
    }
}

impl From<BackendError> for CameraError {
    fn from(err: BackendError) -> Self {
        CameraError::DeviceUnavailable(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for DetectionError {
    fn from(err: reqwest::Error) -> Self {
        DetectionError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_message_is_kept() {
        let err = DetectionError::Service("No ingredients detected".into());
        assert_eq!(err.user_message(), "No ingredients detected");
    }

    #[test]
    fn test_transport_collapses_to_generic_message() {
        let err = DetectionError::Transport("connection refused".into());
        assert_eq!(err.user_message(), GENERIC_TRANSPORT_MESSAGE);

        let err = DetectionError::Service("   ".into());
        assert_eq!(err.user_message(), GENERIC_TRANSPORT_MESSAGE);
    }

    #[test]
    fn test_backend_error_maps_to_device_unavailable() {
        let err: CameraError = BackendError::DeviceNotFound("/dev/video0".into()).into();
        assert!(matches!(err, CameraError::DeviceUnavailable(_)));
    }

    #[test]
    fn test_camera_and_message_errors_propagate_with_question_mark() {
        fn start(camera: Result<(), CameraError>, staged: Option<()>) -> AppResult<()> {
            camera?;
            staged.ok_or("Nothing was captured")?;
            Ok(())
        }

        let err = start(Err(CameraError::DeviceUnavailable("denied".into())), Some(())).unwrap_err();
        assert!(matches!(err, AppError::Camera(CameraError::DeviceUnavailable(_))));

        let err = start(Ok(()), None).unwrap_err();
        assert!(matches!(err, AppError::Other(ref msg) if msg == "Nothing was captured"));

        let err: AppError = format!("No Tokio runtime available: {}", "gone").into();
        assert!(matches!(err, AppError::Other(_)));
    }
}
