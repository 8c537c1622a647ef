// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides utilities for placing percentage coordinates on
//! screen and fitting images into the available space.

use egui::{pos2, vec2, Pos2, Rect, Vec2};

/// Lowest and highest percentage drawn. Anything outside lands on the edge.
pub const PERCENT_MIN: f64 = -100.0;
pub const PERCENT_MAX: f64 = 200.0;

/// Pull a percentage coordinate into the drawable band.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(PERCENT_MIN, PERCENT_MAX)
}

/// Convert percentage coordinates (0-100) to a position inside `rect`.
pub fn percent_to_screen(x: f64, y: f64, rect: Rect) -> Pos2 {
    pos2(
        rect.min.x + (x / 100.0) as f32 * rect.width(),
        rect.min.y + (y / 100.0) as f32 * rect.height(),
    )
}

/// Convert a position inside `rect` back to percentage coordinates.
#[cfg(test)]
pub fn screen_to_percent(pos: Pos2, rect: Rect) -> (f64, f64) {
    (
        ((pos.x - rect.min.x) / rect.width() * 100.0) as f64,
        ((pos.y - rect.min.y) / rect.height() * 100.0) as f64,
    )
}

/// Largest rect with the image's aspect ratio, centred in `available`.
pub fn fit_rect(image_size: (u32, u32), available: Rect) -> Rect {
    let (img_width, img_height) = image_size;
    if img_width == 0 || img_height == 0 {
        return Rect::from_min_size(available.center(), Vec2::ZERO);
    }

    let img_aspect = img_width as f32 / img_height as f32;
    let available_aspect = available.width() / available.height();

    let size = if img_aspect > available_aspect {
        // Image is wider - fit to width
        vec2(available.width(), available.width() / img_aspect)
    } else {
        // Image is taller - fit to height
        vec2(available.height() * img_aspect, available.height())
    };

    Rect::from_center_size(available.center(), size)
}
