// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::CameraBackendType;
use crate::constants::{DEFAULT_ENDPOINT, DEFAULT_MAX_UPLOAD_BYTES, capture};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Name of the per-user configuration directory
const CONFIG_DIR_NAME: &str = "fridgemate";
/// Configuration file inside [`CONFIG_DIR_NAME`]
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Detection/generation endpoint (multipart POST)
    pub endpoint: String,
    /// Network-layer timeout for a single detection call; `None` waits forever
    pub request_timeout_secs: Option<u64>,
    /// Camera backend used for live capture
    pub camera_backend: CameraBackendType,
    /// Preferred camera device path (e.g. `/dev/video0`)
    pub camera_device: Option<String>,
    /// Image served by the still-image backend
    pub still_image_path: Option<PathBuf>,
    /// JPEG quality for captured stills (0-100)
    pub jpeg_quality: u8,
    /// Largest file accepted for upload
    pub max_upload_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: None,
            camera_backend: CameraBackendType::default(),
            camera_device: None,
            still_image_path: None,
            jpeg_quality: capture::DEFAULT_JPEG_QUALITY,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the configuration from the default location
    ///
    /// A missing file (or no config directory at all) yields the defaults.
    pub fn load() -> AppResult<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load the configuration from a specific file
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse '{}': {}", path.display(), e))
        })?;

        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, json)?;

        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Timeout handed to the HTTP client, if any
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
