// SPDX-License-Identifier: GPL-3.0-only

//! Direct V4L2 capture backend
//!
//! Opens a `/dev/video*` node with the v4l crate, negotiates MJPG (falling
//! back to YUYV) and decodes frames on a dedicated capture thread. The most
//! recent RGBA frame is kept for preview and still capture.

use super::format_converters::{mjpeg_to_rgba, yuyv_to_rgba};
use super::types::{
    BackendError, BackendResult, CameraBackendType, CameraDevice, CameraFrame, FacingMode,
};
use super::{CameraBackend, DeviceStream};
use crate::constants::capture::V4L2_BUFFER_COUNT;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::{Format, FourCC};

/// How long to wait for the capture thread to report that streaming started
const STREAM_START_TIMEOUT: Duration = Duration::from_secs(5);

/// Camera backend talking to V4L2 devices
#[derive(Debug, Clone, Default)]
pub struct V4l2Backend {
    /// Preferred device path; otherwise picked by facing mode
    preferred_path: Option<String>,
}

impl V4l2Backend {
    pub fn new(preferred_path: Option<String>) -> Self {
        Self { preferred_path }
    }

    /// Pick the device to open for `facing`
    fn select_device(&self, facing: FacingMode) -> BackendResult<CameraDevice> {
        let cameras = self.enumerate_cameras();

        if let Some(path) = &self.preferred_path {
            return cameras
                .into_iter()
                .find(|cam| &cam.path == path)
                .ok_or_else(|| BackendError::DeviceNotFound(path.clone()));
        }

        let fallback = cameras.first().cloned();
        cameras
            .into_iter()
            .find(|cam| cam.matches_facing(facing))
            .or(fallback)
            .ok_or_else(|| BackendError::DeviceNotFound("No V4L2 capture devices".to_string()))
    }
}

impl CameraBackend for V4l2Backend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        let mut cameras = Vec::new();

        for node in v4l::context::enum_devices() {
            let path = node.path().display().to_string();
            let Ok(dev) = Device::with_path(node.path()) else {
                debug!(path = %path, "Skipping device that cannot be opened");
                continue;
            };
            let Ok(caps) = dev.query_caps() else {
                continue;
            };
            if !caps
                .capabilities
                .contains(v4l::capability::Flags::VIDEO_CAPTURE)
            {
                continue;
            }

            cameras.push(CameraDevice {
                name: node.name().unwrap_or_else(|| caps.card.clone()),
                path,
                location: None,
            });
        }

        cameras.sort_by(|a, b| a.path.cmp(&b.path));
        cameras
    }

    fn open_stream(&mut self, facing: FacingMode) -> BackendResult<Box<dyn DeviceStream>> {
        let device = self.select_device(facing)?;
        info!(device = %device.name, path = %device.path, "Opening V4L2 stream");

        let dev = Device::with_path(&device.path)?;
        let format = negotiate_format(&dev)?;

        let running = Arc::new(AtomicBool::new(true));
        let latest = Arc::new(Mutex::new(None));
        let (ready_tx, ready_rx) = mpsc::channel();

        let thread_running = Arc::clone(&running);
        let thread_latest = Arc::clone(&latest);
        let thread_format = format.clone();
        let thread_handle = std::thread::spawn(move || {
            if let Err(e) = capture_loop(dev, thread_format, thread_running, thread_latest, ready_tx)
            {
                error!(error = %e, "V4L2 capture loop failed");
            }
        });

        match ready_rx.recv_timeout(STREAM_START_TIMEOUT) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = thread_handle.join();
                return Err(BackendError::DeviceBusy(e));
            }
            Err(_) => {
                stop_capture_thread(&running, thread_handle);
                return Err(BackendError::DeviceBusy(
                    "Timed out waiting for the stream to start".to_string(),
                ));
            }
        }

        Ok(Box::new(V4l2Stream {
            resolution: (format.width, format.height),
            running,
            latest,
            thread_handle: Some(thread_handle),
        }))
    }

    fn backend_type(&self) -> CameraBackendType {
        CameraBackendType::V4l2
    }
}

/// Ask for MJPG at the device's current size, accept YUYV otherwise
fn negotiate_format(dev: &Device) -> BackendResult<Format> {
    let current = dev.format()?;
    let mjpg = FourCC::new(b"MJPG");
    let yuyv = FourCC::new(b"YUYV");

    for fourcc in [mjpg, yuyv] {
        match dev.set_format(&Format::new(current.width, current.height, fourcc)) {
            Ok(actual) if actual.fourcc == fourcc => {
                info!(
                    width = actual.width,
                    height = actual.height,
                    fourcc = ?actual.fourcc,
                    "V4L2 format configured"
                );
                return Ok(actual);
            }
            Ok(actual) => {
                debug!(requested = ?fourcc, got = ?actual.fourcc, "Device substituted format");
            }
            Err(e) => {
                debug!(requested = ?fourcc, error = %e, "Format rejected");
            }
        }
    }

    Err(BackendError::FormatNotSupported(
        "Device supports neither MJPG nor YUYV".to_string(),
    ))
}

/// Capture loop running on its own thread until `running` is cleared
fn capture_loop(
    dev: Device,
    format: Format,
    running: Arc<AtomicBool>,
    latest: Arc<Mutex<Option<CameraFrame>>>,
    ready: mpsc::Sender<Result<(), String>>,
) -> Result<(), String> {
    static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

    let mut stream = match Stream::with_buffers(&dev, Type::VideoCapture, V4L2_BUFFER_COUNT) {
        Ok(stream) => stream,
        Err(e) => {
            let msg = format!("Failed to create buffer stream: {}", e);
            let _ = ready.send(Err(msg.clone()));
            return Err(msg);
        }
    };
    let _ = ready.send(Ok(()));

    let is_mjpg = format.fourcc == FourCC::new(b"MJPG");
    info!(is_mjpg, "V4L2 capture stream started");

    while running.load(Ordering::SeqCst) {
        let (buf, _meta) = match stream.next() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "Failed to dequeue frame");
                continue;
            }
        };
        let captured_at = Instant::now();

        let decoded = if is_mjpg {
            mjpeg_to_rgba(buf)
        } else {
            Ok((
                yuyv_to_rgba(buf, format.width, format.height),
                format.width,
                format.height,
            ))
        };

        let frame_num = FRAME_COUNTER.fetch_add(1, Ordering::Relaxed);
        match decoded {
            Ok((rgba, width, height)) => {
                let frame = CameraFrame {
                    captured_at,
                    ..CameraFrame::from_rgba(width, height, rgba)
                };
                if let Ok(mut guard) = latest.lock() {
                    *guard = Some(frame);
                }
            }
            Err(e) => {
                // Corrupt MJPG frames are common right after stream start
                if frame_num % 30 == 0 {
                    warn!(frame = frame_num, error = %e, "Dropping undecodable frame");
                }
            }
        }
    }

    info!("V4L2 capture stream stopped");
    Ok(())
}

/// Clear the running flag and wait for the capture thread to close the device
fn stop_capture_thread(running: &AtomicBool, handle: std::thread::JoinHandle<()>) {
    running.store(false, Ordering::SeqCst);
    match handle.join() {
        Ok(()) => info!("V4L2 capture thread stopped"),
        Err(_) => warn!("V4L2 capture thread panicked"),
    }
}

/// An active V4L2 stream; the capture thread is the device's only track
struct V4l2Stream {
    resolution: (u32, u32),
    running: Arc<AtomicBool>,
    latest: Arc<Mutex<Option<CameraFrame>>>,
    thread_handle: Option<std::thread::JoinHandle<()>>,
}

impl DeviceStream for V4l2Stream {
    fn native_resolution(&self) -> Option<(u32, u32)> {
        Some(self.resolution)
    }

    fn latest_frame(&self) -> Option<CameraFrame> {
        self.latest.lock().ok().and_then(|guard| guard.clone())
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.thread_handle.take() {
            stop_capture_thread(&self.running, handle);
        }

        if let Ok(mut guard) = self.latest.lock() {
            *guard = None;
        }
    }

    fn is_live(&self) -> bool {
        self.thread_handle.is_some()
    }
}

impl Drop for V4l2Stream {
    fn drop(&mut self) {
        self.stop();
    }
}
