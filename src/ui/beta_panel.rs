// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Route summary and beta panel.
//!
//! This module shows the route's grade, hold count and style, its
//! description, and the beta steps in the order they were received.

use crate::models::route::RouteAnalysis;
use egui::{Color32, RichText};

const INDIGO: Color32 = Color32::from_rgb(129, 140, 248);
const CYAN: Color32 = Color32::from_rgb(34, 211, 238);
const MUTED: Color32 = Color32::from_gray(100);

/// Result of beta panel interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BetaPanelAction {
    None,
    Back,
}

/// Grade, hold count and style in three columns.
pub fn show_stats(ui: &mut egui::Ui, analysis: &RouteAnalysis) {
    ui.columns(3, |columns| {
        stat(&mut columns[0], "GRADE", &analysis.grade, INDIGO, 28.0);
        stat(&mut columns[1], "HOLDS", &analysis.hold_count().to_string(), Color32::WHITE, 28.0);
        stat(&mut columns[2], "STYLE", &analysis.style.to_uppercase(), CYAN, 14.0);
    });
}

fn stat(ui: &mut egui::Ui, caption: &str, value: &str, color: Color32, size: f32) {
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(caption).small().strong().color(MUTED));
        ui.label(RichText::new(value).size(size).strong().italics().color(color));
    });
}

/// Display the name, description and beta list.
pub fn show(ui: &mut egui::Ui, analysis: &RouteAnalysis) -> BetaPanelAction {
    let mut action = BetaPanelAction::None;

    ui.horizontal(|ui| {
        if ui.button(RichText::new("⬅").color(INDIGO).size(18.0)).clicked() {
            action = BetaPanelAction::Back;
        }
        ui.vertical(|ui| {
            ui.heading(RichText::new(analysis.name.to_uppercase()).strong().italics());
            ui.label(RichText::new("ANALYSIS_REPORT_READY").small().monospace().color(MUTED));
        });
    });

    if !analysis.description.is_empty() {
        ui.add_space(12.0);
        egui::Frame::group(ui.style()).rounding(16.0).show(ui, |ui| {
            ui.label(RichText::new(&analysis.description).italics().size(15.0));
        });
    }

    ui.add_space(16.0);
    ui.label(RichText::new("MOVEMENT SEQUENCE (BETA)").small().strong().color(MUTED));
    ui.add_space(8.0);

    if analysis.beta.is_empty() {
        ui.label(RichText::new("No beta provided for this route.").weak());
    }

    for (i, step) in analysis.beta.iter().enumerate() {
        ui.horizontal_top(|ui| {
            ui.label(
                RichText::new(step.step.to_string())
                    .size(18.0)
                    .strong()
                    .monospace()
                    .color(Color32::WHITE),
            );
            ui.add_space(12.0);
            ui.vertical(|ui| {
                ui.label(RichText::new(step.action.to_uppercase()).small().strong().color(INDIGO));
                ui.label(step.description.as_str());
            });
        });
        if i + 1 < analysis.beta.len() {
            ui.separator();
        }
    }

    action
}
