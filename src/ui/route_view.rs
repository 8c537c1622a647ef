// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotated route overlay.
//!
//! Draws the captured wall photo with the route path through the holds in
//! the order received, one marker per hold, and the route summary. Layout
//! is computed in percentages of the image rect so it holds at any size.

use crate::models::route::{HoldType, MarkerShape, RouteAnalysis};
use crate::shell::RouteLabel;
use crate::util::geometry::{clamp_percent, fit_rect, percent_to_screen};
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke};

const PATH_COLOR: Color32 = Color32::from_rgb(129, 140, 248);
const ACCENT: Color32 = Color32::from_rgb(99, 102, 241);

/// One hold marker in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldMarker {
    pub center: Pos2,
    pub radius: f32,
    pub hold_type: HoldType,
    pub label: String,
    pub description: Option<String>,
}

/// Everything drawn on top of the photo.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOverlay {
    pub path: Vec<Pos2>,
    pub markers: Vec<HoldMarker>,
}

/// Place the path and markers for `analysis` inside `image_rect`.
///
/// Coordinates far off the image are clamped so the path stays finite.
pub fn layout(analysis: &RouteAnalysis, image_rect: Rect) -> RouteOverlay {
    let radius = if image_rect.width() < 640.0 { 16.0 } else { 20.0 };

    let markers: Vec<HoldMarker> = analysis
        .holds
        .iter()
        .enumerate()
        .map(|(idx, hold)| HoldMarker {
            center: percent_to_screen(clamp_percent(hold.x), clamp_percent(hold.y), image_rect),
            radius,
            hold_type: hold.hold_type,
            label: hold.hold_type.node_label(idx),
            description: hold.description.clone(),
        })
        .collect();

    RouteOverlay {
        path: markers.iter().map(|m| m.center).collect(),
        markers,
    }
}

fn rgba([r, g, b, a]: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Display the photo with the route overlay, filling the available space.
pub fn show(
    ui: &mut egui::Ui,
    texture: &egui::TextureHandle,
    image_size: (u32, u32),
    analysis: &RouteAnalysis,
    label: Option<&RouteLabel>,
) {
    let available = ui.available_size();
    let (canvas, _) = ui.allocate_exact_size(available, Sense::hover());
    let image_rect = fit_rect(image_size, canvas);
    let painter = ui.painter_at(canvas);

    painter.rect_filled(canvas, 16.0, Color32::from_rgb(15, 23, 42));
    painter.image(
        texture.id(),
        image_rect,
        Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        Color32::from_gray(180),
    );

    let overlay = layout(analysis, image_rect);

    if overlay.path.len() >= 2 {
        painter.add(Shape::line(
            overlay.path.clone(),
            Stroke::new(8.0, PATH_COLOR.gamma_multiply(0.15)),
        ));
        painter.extend(Shape::dashed_line(
            &overlay.path,
            Stroke::new(3.0, PATH_COLOR.gamma_multiply(0.7)),
            12.0,
            12.0,
        ));
    }

    for (idx, marker) in overlay.markers.iter().enumerate() {
        draw_marker(&painter, marker);

        let hit = Rect::from_center_size(marker.center, egui::vec2(marker.radius, marker.radius) * 2.0);
        let response = ui.interact(hit, ui.id().with(("hold", idx)), Sense::hover());
        response.on_hover_ui(|ui| {
            ui.label(egui::RichText::new(&marker.label).strong().monospace());
            if let Some(description) = &marker.description {
                ui.label(description.as_str());
            }
        });
    }

    draw_header(&painter, image_rect, analysis);
    draw_footer(&painter, image_rect, analysis, label);
}

fn draw_marker(painter: &egui::Painter, marker: &HoldMarker) {
    let style = marker.hold_type.marker_style();
    let stroke = Stroke::new(2.0, rgba(style.stroke));
    let fill = rgba(style.fill);

    if style.glow {
        painter.circle_filled(marker.center, marker.radius * 1.4, fill.gamma_multiply(0.35));
    }

    match style.shape {
        MarkerShape::Circle => {
            painter.circle(marker.center, marker.radius, fill, stroke);
        }
        MarkerShape::RoundedSquare => {
            let rect = Rect::from_center_size(marker.center, egui::vec2(marker.radius, marker.radius) * 2.0);
            painter.rect(rect, marker.radius * 0.35, fill, stroke);
        }
    }

    painter.circle_filled(marker.center, 4.0, Color32::WHITE);
}

fn draw_header(painter: &egui::Painter, image_rect: Rect, analysis: &RouteAnalysis) {
    let origin = image_rect.min + egui::vec2(24.0, 24.0);

    let name = painter.layout_no_wrap(
        analysis.name.to_uppercase(),
        FontId::proportional(24.0),
        Color32::WHITE,
    );
    let style = painter.layout_no_wrap(
        analysis.style.to_uppercase(),
        FontId::monospace(11.0),
        PATH_COLOR,
    );
    let width = name.size().x.max(style.size().x + 16.0);
    let panel = Rect::from_min_size(
        origin,
        egui::vec2(width + 32.0, name.size().y + style.size().y + 28.0),
    );
    painter.rect_filled(panel, 20.0, Color32::from_rgba_unmultiplied(2, 6, 23, 160));

    let name_pos = panel.min + egui::vec2(16.0, 12.0);
    let name_height = name.size().y;
    painter.galley(name_pos, name, Color32::WHITE);
    let style_pos = name_pos + egui::vec2(16.0, name_height + 4.0);
    painter.circle_filled(style_pos + egui::vec2(-10.0, 6.0), 4.0, ACCENT);
    painter.galley(style_pos, style, PATH_COLOR);

    let grade = painter.layout_no_wrap(analysis.grade.clone(), FontId::proportional(30.0), Color32::WHITE);
    let badge = Rect::from_min_size(
        egui::pos2(image_rect.max.x - 24.0 - grade.size().x - 40.0, origin.y),
        grade.size() + egui::vec2(40.0, 24.0),
    );
    painter.rect(badge, 20.0, ACCENT, Stroke::new(1.0, Color32::from_white_alpha(50)));
    painter.galley(badge.min + egui::vec2(20.0, 12.0), grade, Color32::WHITE);
}

fn draw_footer(
    painter: &egui::Painter,
    image_rect: Rect,
    analysis: &RouteAnalysis,
    label: Option<&RouteLabel>,
) {
    let font = FontId::monospace(10.0);
    let color = PATH_COLOR.gamma_multiply(0.8);
    let left = image_rect.min.x + 24.0;
    let bottom = image_rect.max.y - 24.0;

    let lines = [
        format!("ID: {}", label.map(RouteLabel::as_str).unwrap_or("#RT-----")),
        format!("NODES: {} points detected", analysis.hold_count()),
        "SURFACE: SCAN_COMPLETE_100%".to_string(),
    ];
    for (i, line) in lines.iter().rev().enumerate() {
        painter.text(
            egui::pos2(left, bottom - i as f32 * 14.0),
            Align2::LEFT_BOTTOM,
            line,
            font.clone(),
            color,
        );
    }
}
