// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Live camera frames through OpenCV's `VideoCapture`.

use super::{FrameSource, Resolution};
use crate::error::CaptureError;
use image::RgbImage;
use opencv::core::Mat;
use opencv::prelude::*;
use opencv::{imgproc, videoio};

/// A system camera opened by index.
pub struct OpenCvCamera {
    index: i32,
    capture: Option<videoio::VideoCapture>,
}

impl OpenCvCamera {
    pub fn new(index: i32) -> Self {
        Self { index, capture: None }
    }
}

fn device_error(e: opencv::Error) -> CaptureError {
    CaptureError::Device(e.to_string())
}

fn frame_error(e: opencv::Error) -> CaptureError {
    CaptureError::Frame(e.to_string())
}

impl FrameSource for OpenCvCamera {
    fn acquire(&mut self, preferred: Resolution) -> Result<(), CaptureError> {
        self.release();

        let mut capture =
            videoio::VideoCapture::new(self.index, videoio::CAP_ANY).map_err(device_error)?;
        if !capture.is_opened().map_err(device_error)? {
            return Err(CaptureError::Device(format!("camera {} could not be opened", self.index)));
        }

        // Best effort: drivers fall back to the closest supported mode.
        capture
            .set(videoio::CAP_PROP_FRAME_WIDTH, preferred.width as f64)
            .map_err(device_error)?;
        capture
            .set(videoio::CAP_PROP_FRAME_HEIGHT, preferred.height as f64)
            .map_err(device_error)?;

        self.capture = Some(capture);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<RgbImage, CaptureError> {
        let capture = self.capture.as_mut().ok_or(CaptureError::NotActive)?;

        let mut bgr = Mat::default();
        if !capture.read(&mut bgr).map_err(frame_error)? || bgr.empty() {
            return Err(CaptureError::Frame("camera returned an empty frame".into()));
        }

        let mut rgb = Mat::default();
        imgproc::cvt_color(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB, 0).map_err(frame_error)?;

        let width = rgb.cols() as u32;
        let height = rgb.rows() as u32;
        let data = rgb.data_bytes().map_err(frame_error)?.to_vec();
        RgbImage::from_raw(width, height, data)
            .ok_or_else(|| CaptureError::Frame("frame buffer size mismatch".into()))
    }

    fn release(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            if let Err(e) = capture.release() {
                log::warn!("Failed to release camera {}: {}", self.index, e);
            }
        }
    }

    fn describe(&self) -> String {
        format!("camera {}", self.index)
    }
}
