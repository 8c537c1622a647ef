// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Photo loading and saving.
//!
//! This module handles reading wall photos from disk into RGB frame buffers
//! and writing captured snapshots back out as JPEG files.

use crate::capture::Snapshot;
use anyhow::{Context, Result};
use image::RgbImage;
use std::path::Path;

/// Load an image file into an RGB frame buffer.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?;
    Ok(img.to_rgb8())
}

/// Write the captured JPEG bytes of a snapshot to `path`.
pub fn save_jpeg(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let bytes = snapshot.to_jpeg_bytes()?;
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Convert an RGB frame into RGBA pixels for an egui texture.
pub fn to_rgba_pixels(frame: &RgbImage) -> Vec<u8> {
    image::DynamicImage::ImageRgb8(frame.clone()).to_rgba8().into_raw()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::encode_jpeg_base64;

    #[test]
    fn test_load_missing_file_fails() {
        assert!(load_image(Path::new("/definitely/not/here.jpg")).is_err());
    }

    #[test]
    fn test_save_and_reload_snapshot() {
        let frame = RgbImage::from_pixel(32, 24, image::Rgb([200, 40, 40]));
        let snapshot = Snapshot {
            base64: encode_jpeg_base64(&frame, 90).unwrap(),
            width: 32,
            height: 24,
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wall.jpg");
        save_jpeg(&snapshot, &path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.dimensions(), (32, 24));
    }

    #[test]
    fn test_rgba_pixels_length() {
        let frame = RgbImage::new(4, 3);
        assert_eq!(to_rgba_pixels(&frame).len(), 4 * 3 * 4);
    }
}
