// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It drives the shell state machine, owns the camera
//! stream while the camera view is open, and runs each analysis on a
//! background thread.

use crate::analysis::RouteAnalyzer;
use crate::capture::stream::CameraStream;
use crate::capture::{FrameSource, Snapshot};
use crate::config::AppConfig;
use crate::error::AnalysisError;
use crate::models::route::RouteAnalysis;
use crate::models::status::AppStatus;
use crate::shell::{RequestToken, Shell};
use crate::ui::{beta_panel, camera_view, route_view, toolbar};
use image::RgbImage;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

/// Where camera-view frames come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// System camera by index.
    Camera(i32),
    /// A photo on disk, served as a still frame.
    Photo(PathBuf),
}

impl SourceKind {
    fn open(&self) -> Box<dyn FrameSource> {
        match self {
            SourceKind::Photo(path) => Box::new(crate::capture::still::StillImageSource::new(path)),
            #[cfg(feature = "camera-opencv")]
            SourceKind::Camera(index) => Box::new(crate::capture::camera::OpenCvCamera::new(*index)),
            #[cfg(not(feature = "camera-opencv"))]
            SourceKind::Camera(_) => Box::new(crate::capture::NoCamera),
        }
    }
}

type AnalysisOutcome = (RequestToken, Result<RouteAnalysis, AnalysisError>);

/// Main application state.
pub struct ClimbScanApp {
    ctx: egui::Context,

    config: AppConfig,

    /// Analysis backend shared with worker threads
    analyzer: Arc<dyn RouteAnalyzer>,

    /// Capture / analyze / results state machine
    shell: Shell,

    /// Source used when the camera view opens
    default_source: SourceKind,

    /// One-off source chosen from the File menu
    next_source: Option<SourceKind>,

    /// Camera worker, alive only while the camera view is shown
    camera: Option<CameraStream>,

    /// Live preview texture and its size
    preview: Option<(egui::TextureHandle, (u32, u32))>,

    /// Captured photo texture for the results view
    result_image: Option<(egui::TextureHandle, (u32, u32))>,

    /// Receiver for the analysis running in the background
    analysis_rx: Option<Receiver<AnalysisOutcome>>,

    /// Transient message shown in the status bar
    notice: Option<String>,
}

impl ClimbScanApp {
    /// Create a new application instance.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        analyzer: Arc<dyn RouteAnalyzer>,
        default_source: SourceKind,
    ) -> Self {
        Self {
            ctx: cc.egui_ctx.clone(),
            config,
            analyzer,
            shell: Shell::new(),
            default_source,
            next_source: None,
            camera: None,
            preview: None,
            result_image: None,
            analysis_rx: None,
            notice: None,
        }
    }

    /// Enter the camera view and start acquiring the frame source.
    fn start_scan(&mut self) {
        if let Err(e) = self.shell.start_scan() {
            log::warn!("{}", e);
            return;
        }
        let source = self
            .next_source
            .take()
            .unwrap_or_else(|| self.default_source.clone());

        let ctx = self.ctx.clone();
        self.camera = Some(CameraStream::spawn(
            source.open(),
            self.config.resolution(),
            self.config.capture.jpeg_quality,
            move || ctx.request_repaint(),
        ));
    }

    /// Stop the camera worker, which releases the device.
    fn close_camera(&mut self) {
        if let Some(mut stream) = self.camera.take() {
            stream.close();
        }
        self.preview = None;
    }

    /// Apply whatever the camera worker produced since the last frame.
    fn poll_camera(&mut self) {
        let Some(stream) = self.camera.as_mut() else {
            return;
        };
        let update = stream.poll();

        if let Some(frame) = update.frame {
            self.set_preview(&frame);
        }
        match update.captured {
            Some(Ok(snapshot)) => self.analyze_snapshot(snapshot),
            Some(Err(e)) => {
                log::error!("Capture failed: {}", e);
                self.notice = Some(e.to_string());
            }
            None => {}
        }
    }

    /// Leave the camera view and hand the snapshot to the analyzer.
    fn analyze_snapshot(&mut self, snapshot: Snapshot) {
        self.close_camera();
        log::info!("Analysing {}x{} snapshot", snapshot.width, snapshot.height);

        let image = snapshot.base64.clone();
        match self.shell.capture_succeeded(snapshot) {
            Ok(token) => self.spawn_analysis(token, image),
            Err(e) => log::warn!("{}", e),
        }
    }

    /// Run the analysis on a background thread.
    fn spawn_analysis(&mut self, token: RequestToken, image: String) {
        let (sender, receiver) = channel();
        self.analysis_rx = Some(receiver);

        let analyzer = Arc::clone(&self.analyzer);
        let ctx = self.ctx.clone();
        std::thread::spawn(move || {
            let result = analyzer.analyze(&image);
            // The receiver is gone if the user reset meanwhile.
            let _ = sender.send((token, result));
            ctx.request_repaint();
        });
    }

    /// Apply a finished analysis, if one arrived.
    fn poll_analysis(&mut self) {
        let Some(receiver) = &self.analysis_rx else {
            return;
        };
        let Ok((token, result)) = receiver.try_recv() else {
            return;
        };
        self.analysis_rx = None;

        if !self.shell.analysis_finished(token, result) || self.shell.status() != AppStatus::Results {
            return;
        }
        let loaded = match self.shell.captured() {
            Some(snapshot) => load_snapshot_texture(&self.ctx, snapshot),
            None => Err(anyhow::anyhow!("no captured photo")),
        };
        match loaded {
            Ok(image) => self.result_image = Some(image),
            Err(e) => {
                let message = format!("Could not display the captured photo: {:#}", e);
                if let Err(e) = self.shell.results_unavailable(message) {
                    log::warn!("{}", e);
                }
            }
        }
    }

    /// Return to the home screen from anywhere.
    fn reset(&mut self) {
        if let Some(token) = self.shell.pending() {
            log::debug!("Discarding result of analysis {:?}", token);
        }
        self.close_camera();
        self.analysis_rx = None;
        self.result_image = None;
        self.notice = None;
        self.shell.reset();
    }

    /// Upload a new preview frame.
    fn set_preview(&mut self, frame: &RgbImage) {
        let size = frame.dimensions();
        let image = color_image(frame);
        match &mut self.preview {
            Some((texture, preview_size)) => {
                texture.set(image, egui::TextureOptions::LINEAR);
                *preview_size = size;
            }
            None => {
                let texture = self.ctx.load_texture("camera_preview", image, egui::TextureOptions::LINEAR);
                self.preview = Some((texture, size));
            }
        }
    }

    /// Open a photo from disk and show it in the camera view.
    fn open_photo(&mut self, path: PathBuf) {
        self.reset();
        self.next_source = Some(SourceKind::Photo(path));
        self.start_scan();
    }

    /// Export the current analysis to a file.
    fn export_analysis(&mut self, path: PathBuf) {
        let Some(analysis) = self.shell.analysis() else {
            return;
        };
        match crate::io::serialization::export_by_extension(analysis, &path) {
            Ok(()) => {
                log::info!("Exported analysis to {}", path.display());
                self.notice = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export analysis: {}", e);
                self.notice = Some(format!("Export failed: {}", e));
            }
        }
    }

    /// Save the captured photo as JPEG.
    fn save_photo(&mut self, path: PathBuf) {
        let Some(snapshot) = self.shell.captured() else {
            return;
        };
        match crate::io::media::save_jpeg(snapshot, &path) {
            Ok(()) => {
                log::info!("Saved photo to {}", path.display());
                self.notice = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to save photo: {:#}", e);
                self.notice = Some(format!("Save failed: {}", e));
            }
        }
    }

    fn show_idle(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 5.0);
            ui.label(
                egui::RichText::new("● AI VISION ACTIVE")
                    .small()
                    .strong()
                    .color(egui::Color32::from_rgb(129, 140, 248)),
            );
            ui.add_space(12.0);
            ui.heading(egui::RichText::new("MASTER THE WALL").size(48.0).strong().italics());
            ui.add_space(8.0);
            ui.label(
                egui::RichText::new("Scan a wall, read the beta, climb smarter.")
                    .size(16.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(24.0);
            let button = egui::Button::new(egui::RichText::new("📷 SCAN NOW").size(18.0).strong())
                .min_size(egui::vec2(220.0, 52.0))
                .rounding(26.0)
                .fill(egui::Color32::from_rgb(79, 70, 229));
            if ui.add(button).clicked() {
                self.start_scan();
            }
        });
    }

    fn show_analyzing(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 3.0);
            ui.add(egui::Spinner::new().size(64.0));
            ui.add_space(24.0);
            ui.heading(egui::RichText::new("COMPUTING TRAJECTORY").size(32.0).strong().italics());
            ui.label(
                egui::RichText::new("Identifying holds and sequencing the most efficient beta...")
                    .color(egui::Color32::from_gray(130)),
            );
        });
    }

    fn show_error(&mut self, ui: &mut egui::Ui) {
        let message = self.shell.error().unwrap_or("Analysis failed.").to_string();
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 3.0);
            ui.heading(egui::RichText::new("ANALYSIS FAILED").size(28.0).strong());
            ui.add_space(12.0);
            ui.label(egui::RichText::new(message).color(egui::Color32::from_rgb(251, 113, 133)));
            ui.add_space(24.0);
            if ui.button("Start over").clicked() {
                self.reset();
            }
        });
    }

    fn show_results(&mut self, ui: &mut egui::Ui) {
        let (Some(analysis), Some((texture, size))) = (self.shell.analysis(), self.result_image.as_ref()) else {
            ui.label("Loading image...");
            return;
        };

        let mut back = false;
        ui.columns(2, |columns| {
            let left = &mut columns[0];
            let stats_height = 72.0;
            let view_size = left.available_size() - egui::vec2(0.0, stats_height);
            left.allocate_ui(view_size, |ui| {
                route_view::show(ui, texture, *size, analysis, self.shell.label());
            });
            beta_panel::show_stats(left, analysis);

            egui::ScrollArea::vertical().show(&mut columns[1], |ui| {
                if beta_panel::show(ui, analysis) == beta_panel::BetaPanelAction::Back {
                    back = true;
                }
            });
        });

        if back {
            self.reset();
        }
    }
}

fn color_image(frame: &RgbImage) -> egui::ColorImage {
    let size = [frame.width() as usize, frame.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, &crate::io::media::to_rgba_pixels(frame))
}

fn load_snapshot_texture(
    ctx: &egui::Context,
    snapshot: &Snapshot,
) -> anyhow::Result<(egui::TextureHandle, (u32, u32))> {
    let frame = snapshot.decode()?;
    let texture = ctx.load_texture("captured_photo", color_image(&frame), egui::TextureOptions::LINEAR);
    Ok((texture, frame.dimensions()))
}

impl eframe::App for ClimbScanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_analysis();

        if self.shell.status() == AppStatus::Camera {
            self.poll_camera();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Photo...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"])
                            .pick_file()
                        {
                            self.open_photo(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    let has_results = self.shell.analysis().is_some();
                    ui.add_enabled_ui(has_results, |ui| {
                        ui.menu_button("Export Analysis", |ui| {
                            if ui.button("Export as YAML...").clicked() {
                                if let Some(path) = rfd::FileDialog::new()
                                    .add_filter("YAML", &["yaml", "yml"])
                                    .set_file_name("route.yaml")
                                    .save_file()
                                {
                                    self.export_analysis(path);
                                }
                                ui.close_menu();
                            }
                            if ui.button("Export as JSON...").clicked() {
                                if let Some(path) = rfd::FileDialog::new()
                                    .add_filter("JSON", &["json"])
                                    .set_file_name("route.json")
                                    .save_file()
                                {
                                    self.export_analysis(path);
                                }
                                ui.close_menu();
                            }
                        });
                    });
                    let has_photo = self.shell.captured().is_some();
                    if ui.add_enabled(has_photo, egui::Button::new("Save Captured Photo...")).clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JPEG", &["jpg", "jpeg"])
                            .set_file_name("wall.jpg")
                            .save_file()
                        {
                            self.save_photo(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, self.shell.status()))
            .inner;
        match toolbar_action {
            toolbar::ToolbarAction::Home => self.reset(),
            toolbar::ToolbarAction::Scan => self.start_scan(),
            toolbar::ToolbarAction::None => {}
        }

        // Status bar
        if let Some(notice) = self.notice.clone() {
            egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(notice);
                    if ui.small_button("✖").clicked() {
                        self.notice = None;
                    }
                });
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.shell.status() {
            AppStatus::Idle => self.show_idle(ui),
            AppStatus::Camera => {
                let action = match self.camera.as_ref() {
                    Some(stream) => camera_view::show(
                        ui,
                        camera_view::CameraFrame {
                            preview: self.preview.as_ref().map(|(t, s)| (t, *s)),
                            error: stream.error(),
                            active: stream.is_active() && !stream.is_capturing(),
                            source: stream.describe(),
                        },
                    ),
                    None => camera_view::CameraAction::Close,
                };
                match action {
                    camera_view::CameraAction::Capture => {
                        if let Some(stream) = self.camera.as_mut() {
                            stream.capture();
                        }
                    }
                    camera_view::CameraAction::Retry => {
                        if let Some(stream) = self.camera.as_mut() {
                            stream.retry();
                        }
                    }
                    camera_view::CameraAction::Close => {
                        self.close_camera();
                        if let Err(e) = self.shell.close_camera() {
                            log::warn!("{}", e);
                        }
                    }
                    camera_view::CameraAction::None => {}
                }
            }
            AppStatus::Analyzing => self.show_analyzing(ui),
            AppStatus::Results => self.show_results(ui),
            AppStatus::Error => self.show_error(ui),
        });
    }
}
