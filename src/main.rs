// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! ClimbScan - climbing wall route scanner
//!
//! A cross-platform desktop application that photographs a climbing wall,
//! asks a multimodal AI model for a route, grade and beta, and draws the
//! result over the photo.

mod analysis;
mod app;
mod capture;
mod config;
mod error;
mod io;
mod models;
mod shell;
mod ui;
mod util;

use analysis::{gemini::GeminiTransport, AnalysisClient};
use anyhow::Result;
use app::{ClimbScanApp, SourceKind};
use clap::Parser;
use config::AppConfig;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Scan a climbing wall and overlay an AI-generated route", long_about = None)]
struct Cli {
    /// YAML config file (defaults to ./climbscan.yaml when present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use a photo instead of the camera.
    #[arg(short, long)]
    photo: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    let api_key = config.resolve_api_key()?;

    let transport = GeminiTransport::new(&config.api, api_key);
    let analyzer = Arc::new(AnalysisClient::new(transport));

    let source = match cli.photo {
        Some(path) => SourceKind::Photo(path),
        None => SourceKind::Camera(config.camera.index),
    };
    log::info!("Using model {} with {:?}", config.api.model, source);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("ClimbScan"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "ClimbScan",
        options,
        Box::new(move |cc| Ok(Box::new(ClimbScanApp::new(cc, config, analyzer, source)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
