//! Webcam capture.
//!
//! A dedicated thread probes the device through an ordered list of
//! requested formats, then decodes frames into a triple buffer the UI
//! thread reads without blocking the capture loop. Probe exhaustion
//! parks the camera in `Unavailable`; the UI keeps showing the
//! placeholder and no error ever surfaces past this module.

pub mod placeholder;

use nokhwa::pixel_format::RgbAFormat;
use nokhwa::utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::Camera;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

/// Frames discarded after the stream opens, while the sensor settles.
const WARMUP_FRAMES: u64 = 10;

const STATUS_PROBING: u8 = 0;
const STATUS_LIVE: u8 = 1;
const STATUS_UNAVAILABLE: u8 = 2;

/// Where the capture currently stands. Exhausting every probe yields
/// `Unavailable` rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    Probing,
    Live,
    Unavailable,
}

impl CameraStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraStatus::Probing => "probing",
            CameraStatus::Live => "live",
            CameraStatus::Unavailable => "unavailable",
        }
    }
}

/// One decoded RGBA frame.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub frame_number: u64,
    pub timestamp: Instant,
}

impl CameraFrame {
    /// Age of the frame; the UI treats anything older than about a
    /// second as a lost feed and falls back to the placeholder.
    pub fn age(&self) -> std::time::Duration {
        self.timestamp.elapsed()
    }
}

/// A camera detected on the system.
#[derive(Debug, Clone)]
pub struct CameraInfo {
    pub index: u32,
    pub name: String,
    pub description: String,
}

/// Enumerates attached cameras for startup logging.
pub fn list_cameras() -> Vec<CameraInfo> {
    match nokhwa::query(ApiBackend::Auto) {
        Ok(devices) => devices
            .iter()
            .enumerate()
            .map(|(i, device)| CameraInfo {
                index: i as u32,
                name: device.human_name(),
                description: device.description().to_string(),
            })
            .collect(),
        Err(err) => {
            log::warn!("Failed to enumerate cameras: {}", err);
            Vec::new()
        }
    }
}

/// Background capture with a triple-buffered output slot.
pub struct CameraCapture {
    frames: [Arc<Mutex<Option<CameraFrame>>>; 3],
    latest_frame_idx: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    status: Arc<AtomicU8>,
    frame_count: Arc<AtomicU64>,
    capture_thread: Option<JoinHandle<()>>,
}

impl CameraCapture {
    /// Spawns the capture thread for `camera_index`, preferring a mode
    /// near `width`x`height`.
    pub fn new(camera_index: u32, width: u32, height: u32) -> Result<Self, String> {
        let frames = [
            Arc::new(Mutex::new(None)),
            Arc::new(Mutex::new(None)),
            Arc::new(Mutex::new(None)),
        ];
        let latest_frame_idx = Arc::new(AtomicU64::new(0));
        let running = Arc::new(AtomicBool::new(true));
        let status = Arc::new(AtomicU8::new(STATUS_PROBING));
        let frame_count = Arc::new(AtomicU64::new(0));

        log::info!(
            "Starting camera capture: index {} requesting {}x{}",
            camera_index,
            width,
            height
        );

        let thread_frames = frames.clone();
        let thread_idx = latest_frame_idx.clone();
        let thread_running = running.clone();
        let thread_status = status.clone();
        let thread_count = frame_count.clone();

        let capture_thread = std::thread::Builder::new()
            .name("camera-capture".to_string())
            .spawn(move || {
                capture_loop(
                    camera_index,
                    width,
                    height,
                    thread_frames,
                    thread_idx,
                    thread_running,
                    thread_status,
                    thread_count,
                );
            })
            .map_err(|err| format!("failed to spawn camera thread: {err}"))?;

        Ok(Self {
            frames,
            latest_frame_idx,
            running,
            status,
            frame_count,
            capture_thread: Some(capture_thread),
        })
    }

    /// Clones the most recently published frame, if any.
    pub fn latest_frame(&self) -> Option<CameraFrame> {
        let idx = (self.latest_frame_idx.load(Ordering::Acquire) % 3) as usize;
        self.frames[idx].lock().clone()
    }

    pub fn status(&self) -> CameraStatus {
        match self.status.load(Ordering::Acquire) {
            STATUS_PROBING => CameraStatus::Probing,
            STATUS_LIVE => CameraStatus::Live,
            _ => CameraStatus::Unavailable,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Frames published since the stream opened, warm-up excluded.
    pub fn frame_count(&self) -> u64 {
        self.frame_count.load(Ordering::Relaxed)
    }

    /// Signals the thread and joins it.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.capture_thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

#[allow(clippy::too_many_arguments)]
fn capture_loop(
    camera_index: u32,
    width: u32,
    height: u32,
    frames: [Arc<Mutex<Option<CameraFrame>>>; 3],
    latest_frame_idx: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    status: Arc<AtomicU8>,
    frame_count: Arc<AtomicU64>,
) {
    let index = CameraIndex::Index(camera_index);

    // Ordered probe: the requested size, then whatever the device's best
    // mode is, then the backend default. First success wins.
    let requested = RequestedFormat::new::<RgbAFormat>(RequestedFormatType::HighestResolution(
        Resolution::new(width, height),
    ));
    let mut camera = match Camera::new(index.clone(), requested) {
        Ok(camera) => camera,
        Err(err) => {
            log::warn!(
                "Camera {} rejected {}x{}: {}, trying highest resolution",
                camera_index,
                width,
                height,
                err
            );
            let requested =
                RequestedFormat::new::<RgbAFormat>(RequestedFormatType::AbsoluteHighestResolution);
            match Camera::new(index.clone(), requested) {
                Ok(camera) => camera,
                Err(err) => {
                    log::warn!(
                        "Camera {} rejected highest resolution: {}, trying default format",
                        camera_index,
                        err
                    );
                    let requested = RequestedFormat::new::<RgbAFormat>(RequestedFormatType::None);
                    match Camera::new(index, requested) {
                        Ok(camera) => camera,
                        Err(err) => {
                            log::warn!("Camera {} unavailable: {}", camera_index, err);
                            status.store(STATUS_UNAVAILABLE, Ordering::Release);
                            return;
                        }
                    }
                }
            }
        }
    };

    if let Err(err) = camera.open_stream() {
        log::warn!("Camera {} failed to open stream: {}", camera_index, err);
        status.store(STATUS_UNAVAILABLE, Ordering::Release);
        return;
    }

    let resolution = camera.resolution();
    log::info!(
        "Camera {} streaming at {}x{}",
        camera_index,
        resolution.width(),
        resolution.height()
    );

    let mut frame_number: u64 = 0;
    while running.load(Ordering::Acquire) {
        match camera.frame() {
            Ok(frame) => match frame.decode_image::<RgbAFormat>() {
                Ok(decoded) => {
                    frame_number += 1;
                    if frame_number <= WARMUP_FRAMES {
                        continue;
                    }

                    let camera_frame = CameraFrame {
                        width: decoded.width(),
                        height: decoded.height(),
                        data: decoded.into_raw(),
                        frame_number,
                        timestamp: Instant::now(),
                    };

                    let slot = (latest_frame_idx.load(Ordering::Acquire) + 1) % 3;
                    *frames[slot as usize].lock() = Some(camera_frame);
                    latest_frame_idx.store(slot, Ordering::Release);
                    frame_count.fetch_add(1, Ordering::Relaxed);
                    status.store(STATUS_LIVE, Ordering::Release);
                }
                Err(err) => {
                    log::warn!("Failed to decode camera frame: {}", err);
                }
            },
            Err(err) => {
                log::warn!("Camera capture error: {}", err);
                std::thread::sleep(std::time::Duration::from_millis(10));
            }
        }
    }

    let _ = camera.stop_stream();
    log::info!("Camera {} capture stopped", camera_index);
}
