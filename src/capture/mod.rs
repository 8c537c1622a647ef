// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Device capture adapter.
//!
//! A [`FrameSource`] hands out RGB frames; the [`CaptureAdapter`] owns one
//! and turns the current frame into a base64 JPEG snapshot on demand.
//! Whatever the source acquired is released on `close()` or when the
//! adapter is dropped. [`stream::CameraStream`] runs an adapter on its own
//! thread so device calls never block the UI.

#[cfg(feature = "camera-opencv")]
pub mod camera;
pub mod still;
pub mod stream;

use crate::error::CaptureError;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

/// JPEG quality used for snapshots sent to the analysis service.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Requested stream resolution. Sources treat it as a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const PREFERRED: Resolution = Resolution { width: 1920, height: 1080 };
}

/// Anything that can deliver still frames: a camera or a photo on disk.
pub trait FrameSource: Send {
    /// Open the device. Called again on retry after a failure.
    fn acquire(&mut self, preferred: Resolution) -> Result<(), CaptureError>;

    /// Read the current frame at the source's native resolution.
    fn read_frame(&mut self) -> Result<RgbImage, CaptureError>;

    /// Stop every stream acquired so far. Must be safe to call twice.
    fn release(&mut self);

    /// Short human-readable name for logs.
    fn describe(&self) -> String;

    /// Whether frames change over time. Still sources are previewed once.
    fn is_live(&self) -> bool {
        true
    }
}

/// A captured still, JPEG-encoded and base64'd without a data-URI prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub base64: String,
    pub width: u32,
    pub height: u32,
}

impl Snapshot {
    /// Raw JPEG bytes.
    pub fn to_jpeg_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.base64)
    }

    /// Decode back into an RGB frame, e.g. for display.
    pub fn decode(&self) -> anyhow::Result<RgbImage> {
        let bytes = self.to_jpeg_bytes()?;
        let img = image::load_from_memory_with_format(&bytes, image::ImageFormat::Jpeg)?;
        Ok(img.to_rgb8())
    }
}

/// Encode a frame as JPEG at `quality` and return it base64-encoded.
pub fn encode_jpeg_base64(frame: &RgbImage, quality: u8) -> Result<String, CaptureError> {
    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder.encode_image(frame)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(buffer))
}

enum AdapterState {
    Inactive,
    Active,
    Failed(String),
}

/// Owns a frame source for the lifetime of the camera view.
pub struct CaptureAdapter<S: FrameSource> {
    source: S,
    state: AdapterState,
    preferred: Resolution,
    jpeg_quality: u8,
}

impl<S: FrameSource> CaptureAdapter<S> {
    pub fn new(source: S, preferred: Resolution, jpeg_quality: u8) -> Self {
        Self {
            source,
            state: AdapterState::Inactive,
            preferred,
            jpeg_quality,
        }
    }

    /// Acquire the source. On failure the adapter holds a user-facing error
    /// message instead of becoming active.
    pub fn activate(&mut self) {
        match self.source.acquire(self.preferred) {
            Ok(()) => {
                log::info!("Camera active: {}", self.source.describe());
                self.state = AdapterState::Active;
            }
            Err(e) => {
                log::error!("Failed to open {}: {}", self.source.describe(), e);
                self.source.release();
                self.state = AdapterState::Failed(e.to_string());
            }
        }
    }

    /// Re-attempt acquisition after a failure.
    pub fn retry(&mut self) {
        if self.is_active() {
            return;
        }
        log::info!("Retrying camera acquisition");
        self.activate();
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    pub fn is_live(&self) -> bool {
        self.source.is_live()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, AdapterState::Active)
    }

    /// Message to show in place of the preview, if acquisition failed.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            AdapterState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Pull the latest frame for the live preview.
    pub fn preview(&mut self) -> Option<RgbImage> {
        if !self.is_active() {
            return None;
        }
        match self.source.read_frame() {
            Ok(frame) => Some(frame),
            Err(e) => {
                log::warn!("Dropped preview frame: {}", e);
                None
            }
        }
    }

    /// Snapshot the current frame at its native resolution.
    pub fn capture(&mut self) -> Result<Snapshot, CaptureError> {
        if !self.is_active() {
            return Err(CaptureError::NotActive);
        }
        let frame = self.source.read_frame()?;
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(CaptureError::Frame(format!("empty {}x{} frame", width, height)));
        }
        let base64 = encode_jpeg_base64(&frame, self.jpeg_quality)?;
        log::info!("Captured {}x{} snapshot ({} base64 bytes)", width, height, base64.len());
        Ok(Snapshot { base64, width, height })
    }

    /// Release the source. Idempotent.
    pub fn close(&mut self) {
        if matches!(self.state, AdapterState::Inactive) {
            return;
        }
        self.source.release();
        self.state = AdapterState::Inactive;
        log::info!("Camera released: {}", self.source.describe());
    }
}

impl<S: FrameSource> Drop for CaptureAdapter<S> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Stand-in for builds compiled without a camera backend.
pub struct NoCamera;

impl FrameSource for NoCamera {
    fn acquire(&mut self, _preferred: Resolution) -> Result<(), CaptureError> {
        Err(CaptureError::Device(
            "no camera backend in this build, use File > Open Photo...".to_string(),
        ))
    }

    fn read_frame(&mut self) -> Result<RgbImage, CaptureError> {
        Err(CaptureError::NotActive)
    }

    fn release(&mut self) {}

    fn describe(&self) -> String {
        "no camera".to_string()
    }
}

/// Boxed sources so the app can pick a backend at runtime.
impl FrameSource for Box<dyn FrameSource> {
    fn acquire(&mut self, preferred: Resolution) -> Result<(), CaptureError> {
        (**self).acquire(preferred)
    }

    fn read_frame(&mut self) -> Result<RgbImage, CaptureError> {
        (**self).read_frame()
    }

    fn release(&mut self) {
        (**self).release()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn is_live(&self) -> bool {
        (**self).is_live()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Fake camera that fails a configurable number of times before opening.
    struct FakeCamera {
        width: u32,
        height: u32,
        failures_left: usize,
        open: bool,
        releases: Arc<AtomicUsize>,
    }

    impl FakeCamera {
        fn new(width: u32, height: u32, releases: Arc<AtomicUsize>) -> Self {
            Self { width, height, failures_left: 0, open: false, releases }
        }
    }

    impl FrameSource for FakeCamera {
        fn acquire(&mut self, _preferred: Resolution) -> Result<(), CaptureError> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(CaptureError::Device("permission denied".into()));
            }
            self.open = true;
            Ok(())
        }

        fn read_frame(&mut self) -> Result<RgbImage, CaptureError> {
            if !self.open {
                return Err(CaptureError::NotActive);
            }
            Ok(RgbImage::from_fn(self.width, self.height, |x, y| {
                image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
            }))
        }

        fn release(&mut self) {
            if self.open {
                self.open = false;
                self.releases.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn describe(&self) -> String {
            "fake camera".to_string()
        }
    }

    #[test]
    fn test_capture_keeps_native_dimensions() {
        let releases = Arc::new(AtomicUsize::new(0));
        let camera = FakeCamera::new(640, 360, releases);
        let mut adapter = CaptureAdapter::new(camera, Resolution::PREFERRED, DEFAULT_JPEG_QUALITY);
        adapter.activate();

        let snapshot = adapter.capture().unwrap();
        assert!(!snapshot.base64.starts_with("data:"));
        assert!(snapshot.base64.starts_with("/9j/"));

        let decoded = snapshot.decode().unwrap();
        assert_eq!(decoded.dimensions(), (640, 360));
        assert_eq!((snapshot.width, snapshot.height), (640, 360));
    }

    #[test]
    fn test_capture_requires_active_stream() {
        let releases = Arc::new(AtomicUsize::new(0));
        let mut adapter =
            CaptureAdapter::new(FakeCamera::new(8, 8, releases), Resolution::PREFERRED, 90);
        assert!(matches!(adapter.capture(), Err(CaptureError::NotActive)));
        assert!(adapter.preview().is_none());
    }

    #[test]
    fn test_empty_frame_is_a_frame_error() {
        let releases = Arc::new(AtomicUsize::new(0));
        let mut adapter =
            CaptureAdapter::new(FakeCamera::new(0, 0, releases), Resolution::PREFERRED, 90);
        adapter.activate();
        assert!(matches!(adapter.capture(), Err(CaptureError::Frame(_))));
    }

    #[test]
    fn test_failure_then_retry() {
        let releases = Arc::new(AtomicUsize::new(0));
        let mut camera = FakeCamera::new(8, 8, releases);
        camera.failures_left = 1;
        let mut adapter = CaptureAdapter::new(camera, Resolution::PREFERRED, 90);

        adapter.activate();
        assert!(!adapter.is_active());
        assert!(adapter.error().unwrap().contains("permission denied"));

        adapter.retry();
        assert!(adapter.is_active());
        assert!(adapter.error().is_none());
        assert!(adapter.preview().is_some());
    }

    #[test]
    fn test_drop_releases_stream_once() {
        let releases = Arc::new(AtomicUsize::new(0));
        {
            let mut adapter = CaptureAdapter::new(
                FakeCamera::new(8, 8, releases.clone()),
                Resolution::PREFERRED,
                90,
            );
            adapter.activate();
            adapter.close();
            adapter.close();
        }
        assert_eq!(releases.load(Ordering::SeqCst), 1);

        {
            let mut adapter = CaptureAdapter::new(
                FakeCamera::new(8, 8, releases.clone()),
                Resolution::PREFERRED,
                90,
            );
            adapter.activate();
        }
        assert_eq!(releases.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_no_camera_reports_device_error() {
        let source: Box<dyn FrameSource> = Box::new(NoCamera);
        let mut adapter = CaptureAdapter::new(source, Resolution::PREFERRED, 90);
        adapter.activate();
        assert!(!adapter.is_active());
        assert!(adapter.error().unwrap().starts_with("Camera unavailable"));
    }
}
