// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Top bar with the title and scan controls.
//!
//! The title returns to the home screen; the scan button is only offered
//! where starting a scan is a valid transition.

use crate::models::status::AppStatus;

/// Result of toolbar interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Home,
    Scan,
}

/// Display the toolbar for the current status.
pub fn show(ui: &mut egui::Ui, status: AppStatus) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let title = egui::RichText::new("CLIMBSCAN").size(20.0).strong();
        if ui.add(egui::Label::new(title).sense(egui::Sense::click())).clicked() {
            action = ToolbarAction::Home;
        }

        ui.separator();

        if ui
            .add_enabled(status == AppStatus::Idle, egui::Button::new("📷 Scan"))
            .clicked()
        {
            action = ToolbarAction::Scan;
        }

        ui.separator();

        let status_text = match status {
            AppStatus::Idle => "Point the camera at a wall and scan",
            AppStatus::Camera => "Frame the wall, then capture",
            AppStatus::Analyzing => "Computing route...",
            AppStatus::Results => "Route ready",
            AppStatus::Error => "Analysis failed",
        };

        ui.label(egui::RichText::new(status_text).italics().weak());
    });

    action
}
