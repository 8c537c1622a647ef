// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types shared across the capture, analysis and shell layers.
//!
//! Each adapter translates its internal faults into one of these enums so
//! that the shell only ever needs the `Display` text of a failure.

use crate::models::status::AppStatus;

/// Failures raised by the device capture adapter.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Camera access was denied or the device could not be opened.
    #[error("Camera unavailable. Check your system camera permissions. ({0})")]
    Device(String),
    /// `capture()` was called before a stream was live.
    #[error("Camera stream is not active")]
    NotActive,
    /// The stream is live but did not deliver a usable frame.
    #[error("Failed to read a frame from the camera: {0}")]
    Frame(String),
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[from] image::ImageError),
}

/// Failures raised by the analysis client.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The service answered but carried no text payload.
    #[error("No analysis received from the AI service (empty response)")]
    EmptyResponse,
    /// The payload could not be decoded as a route analysis.
    #[error("Invalid response format from the AI service")]
    InvalidFormat(#[source] serde_json::Error),
    /// The service rejected the request.
    #[error("AI service error ({status}): {message}")]
    Service { status: u16, message: String },
    /// The request never reached the service or the reply was unreadable.
    #[error("Network error while contacting the AI service: {0}")]
    Network(String),
}

/// Rejected state machine transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShellError {
    #[error("cannot {event} while {from}")]
    InvalidTransition { from: AppStatus, event: &'static str },
}
