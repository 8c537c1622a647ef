// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Camera view with live preview and framing guide.
//!
//! This module shows the current camera frame (or the acquisition error
//! with a retry button), a framing guide over the preview, and the
//! capture and close controls.

use crate::util::geometry::fit_rect;
use egui::{Color32, Rect, Sense, Stroke};

const GUIDE: Color32 = Color32::from_rgb(129, 140, 248);

/// Result of camera view interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAction {
    None,
    Capture,
    Close,
    Retry,
}

/// What the camera view needs to draw one frame.
pub struct CameraFrame<'a> {
    pub preview: Option<(&'a egui::TextureHandle, (u32, u32))>,
    pub error: Option<&'a str>,
    pub active: bool,
    pub source: &'a str,
}

/// Display the camera view and report the user's choice.
pub fn show(ui: &mut egui::Ui, frame: CameraFrame<'_>) -> CameraAction {
    let mut action = CameraAction::None;

    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(format!("● SYSTEM_LIVE_SCAN  {}", frame.source))
                .monospace()
                .color(Color32::from_rgb(244, 63, 94)),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("✖ Close").clicked() {
                action = CameraAction::Close;
            }
        });
    });
    ui.separator();

    let controls_height = 72.0;
    let size = ui.available_size() - egui::vec2(0.0, controls_height);
    let size = size.max(egui::Vec2::ZERO);

    if let Some(message) = frame.error {
        ui.allocate_ui_with_layout(size, egui::Layout::top_down(egui::Align::Center), |ui| {
            ui.set_min_size(size);
            ui.add_space(size.y / 3.0);
            ui.label(
                egui::RichText::new(message)
                    .size(16.0)
                    .strong()
                    .color(Color32::from_rgb(251, 113, 133)),
            );
            ui.add_space(16.0);
            if ui.button("⟳ Retry").clicked() {
                action = CameraAction::Retry;
            }
        });
    } else {
        let (canvas, _) = ui.allocate_exact_size(size, Sense::hover());
        let painter = ui.painter_at(canvas);
        painter.rect_filled(canvas, 0.0, Color32::from_rgb(15, 23, 42));

        if let Some((texture, image_size)) = frame.preview {
            let image_rect = fit_rect(image_size, canvas);
            painter.image(
                texture.id(),
                image_rect,
                Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::from_gray(217),
            );
        } else {
            painter.text(
                canvas.center(),
                egui::Align2::CENTER_CENTER,
                "Waiting for camera...",
                egui::FontId::proportional(16.0),
                Color32::from_gray(180),
            );
        }
        draw_framing_guide(&painter, canvas);
    }

    ui.add_space(12.0);
    ui.vertical_centered(|ui| {
        let button = egui::Button::new(egui::RichText::new("📷 Capture").size(20.0).strong())
            .min_size(egui::vec2(180.0, 48.0))
            .rounding(24.0)
            .fill(Color32::from_rgb(79, 70, 229));
        if ui.add_enabled(frame.active, button).clicked() {
            action = CameraAction::Capture;
        }
    });

    action
}

/// Corner brackets, crosshair and hint text in a 3:4 guide box.
fn draw_framing_guide(painter: &egui::Painter, canvas: Rect) {
    let height = (canvas.height() * 0.8).min(canvas.width() * 0.8 * 4.0 / 3.0);
    let guide = Rect::from_center_size(canvas.center(), egui::vec2(height * 0.75, height));
    let stroke = Stroke::new(3.0, GUIDE);
    let arm = 48.0_f32.min(guide.width() / 3.0);

    for (corner, dx, dy) in [
        (guide.left_top(), 1.0, 1.0),
        (guide.right_top(), -1.0, 1.0),
        (guide.left_bottom(), 1.0, -1.0),
        (guide.right_bottom(), -1.0, -1.0),
    ] {
        painter.line_segment([corner, corner + egui::vec2(dx * arm, 0.0)], stroke);
        painter.line_segment([corner, corner + egui::vec2(0.0, dy * arm)], stroke);
    }

    let c = guide.center();
    let cross = Stroke::new(1.5, Color32::from_white_alpha(77));
    painter.line_segment([c - egui::vec2(24.0, 0.0), c + egui::vec2(24.0, 0.0)], cross);
    painter.line_segment([c - egui::vec2(0.0, 24.0), c + egui::vec2(0.0, 24.0)], cross);
    painter.circle_stroke(c, 12.0, cross);

    painter.text(
        egui::pos2(c.x, guide.max.y + 24.0),
        egui::Align2::CENTER_CENTER,
        "ALIGN WITH THE WALL",
        egui::FontId::monospace(11.0),
        Color32::from_white_alpha(180),
    );
}
