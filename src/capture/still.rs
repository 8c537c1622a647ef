// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame source backed by a photo on disk.

use super::{FrameSource, Resolution};
use crate::error::CaptureError;
use image::RgbImage;
use std::path::PathBuf;

/// Serves the same photo as every frame.
pub struct StillImageSource {
    path: PathBuf,
    frame: Option<RgbImage>,
}

impl StillImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), frame: None }
    }
}

impl FrameSource for StillImageSource {
    fn acquire(&mut self, _preferred: Resolution) -> Result<(), CaptureError> {
        let frame = crate::io::media::load_image(&self.path)
            .map_err(|e| CaptureError::Device(format!("{:#}", e)))?;
        log::info!(
            "Loaded photo {} ({}x{})",
            self.path.display(),
            frame.width(),
            frame.height()
        );
        self.frame = Some(frame);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<RgbImage, CaptureError> {
        self.frame.clone().ok_or(CaptureError::NotActive)
    }

    fn release(&mut self) {
        self.frame = None;
    }

    fn describe(&self) -> String {
        format!("photo {}", self.path.display())
    }

    fn is_live(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureAdapter;

    #[test]
    fn test_missing_photo_reports_device_error() {
        let mut source = StillImageSource::new("/no/such/wall.jpg");
        let err = source.acquire(Resolution::PREFERRED).unwrap_err();
        assert!(matches!(err, CaptureError::Device(_)));
    }

    #[test]
    fn test_photo_snapshot_matches_file_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wall.png");
        RgbImage::from_pixel(120, 80, image::Rgb([10, 200, 30]))
            .save(&path)
            .unwrap();

        let mut adapter = CaptureAdapter::new(StillImageSource::new(&path), Resolution::PREFERRED, 90);
        adapter.activate();
        let snapshot = adapter.capture().unwrap();
        assert_eq!((snapshot.width, snapshot.height), (120, 80));
        assert_eq!(snapshot.decode().unwrap().dimensions(), (120, 80));
        assert!(!adapter.is_live());
    }
}
