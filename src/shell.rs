// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application shell state machine.
//!
//! `idle -> camera -> analyzing -> results | error`, with `reset` back to
//! `idle`. The shell owns the captured snapshot and the current analysis,
//! and hands out a [`RequestToken`] for the one analysis allowed in flight.
//! Results carrying any other token are dropped.

use crate::capture::Snapshot;
use crate::error::{AnalysisError, ShellError};
use crate::models::route::RouteAnalysis;
use crate::models::status::AppStatus;
use rand::Rng;

/// Identifies one analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// Cosmetic `#RT-NNNN` label shown on results. Not an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteLabel(String);

impl RouteLabel {
    pub fn random() -> Self {
        let n: u32 = rand::thread_rng().gen_range(1000..=9999);
        Self(format!("#RT-{}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// State machine sequencing capture, analysis and results.
#[derive(Debug, Default)]
pub struct Shell {
    status: AppStatus,
    captured: Option<Snapshot>,
    analysis: Option<RouteAnalysis>,
    label: Option<RouteLabel>,
    error: Option<String>,
    pending: Option<RequestToken>,
    next_token: u64,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> AppStatus {
        self.status
    }

    pub fn captured(&self) -> Option<&Snapshot> {
        self.captured.as_ref()
    }

    pub fn analysis(&self) -> Option<&RouteAnalysis> {
        self.analysis.as_ref()
    }

    pub fn label(&self) -> Option<&RouteLabel> {
        self.label.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Token of the analysis currently in flight.
    pub fn pending(&self) -> Option<RequestToken> {
        self.pending
    }

    fn require_status(&self, status: AppStatus, event: &'static str) -> Result<(), ShellError> {
        if self.status == status {
            Ok(())
        } else {
            Err(ShellError::InvalidTransition { from: self.status, event })
        }
    }

    fn enter(&mut self, status: AppStatus) {
        log::info!("Status {} -> {}", self.status, status);
        self.status = status;
    }

    /// Open the camera view.
    pub fn start_scan(&mut self) -> Result<(), ShellError> {
        self.require_status(AppStatus::Idle, "start scan")?;
        self.enter(AppStatus::Camera);
        Ok(())
    }

    /// Leave the camera view without capturing.
    pub fn close_camera(&mut self) -> Result<(), ShellError> {
        self.require_status(AppStatus::Camera, "close camera")?;
        self.enter(AppStatus::Idle);
        Ok(())
    }

    /// Store the snapshot and start analysing it. The caller must run the
    /// analysis and report back with the returned token.
    pub fn capture_succeeded(&mut self, snapshot: Snapshot) -> Result<RequestToken, ShellError> {
        self.require_status(AppStatus::Camera, "analyze a capture")?;
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        self.captured = Some(snapshot);
        self.pending = Some(token);
        self.enter(AppStatus::Analyzing);
        Ok(token)
    }

    /// Apply the outcome of an analysis. Returns `false` if the token is not
    /// the one in flight, in which case nothing changes.
    pub fn analysis_finished(
        &mut self,
        token: RequestToken,
        result: Result<RouteAnalysis, AnalysisError>,
    ) -> bool {
        if self.status != AppStatus::Analyzing || self.pending != Some(token) {
            log::debug!("Ignoring stale analysis result {:?}", token);
            return false;
        }
        self.pending = None;

        match result {
            Ok(analysis) => {
                self.analysis = Some(analysis);
                self.label = Some(RouteLabel::random());
                self.error = None;
                self.enter(AppStatus::Results);
            }
            Err(e) => {
                log::error!("Analysis failed: {}", e);
                self.analysis = None;
                self.error = Some(e.to_string());
                self.enter(AppStatus::Error);
            }
        }
        true
    }

    /// The results could not be shown, e.g. the captured photo would not
    /// decode. Moves to the error state with `message`.
    pub fn results_unavailable(&mut self, message: impl Into<String>) -> Result<(), ShellError> {
        self.require_status(AppStatus::Results, "show results")?;
        let message = message.into();
        log::error!("{}", message);
        self.analysis = None;
        self.label = None;
        self.error = Some(message);
        self.enter(AppStatus::Error);
        Ok(())
    }

    /// Back to idle from anywhere, discarding the capture, the analysis and
    /// any request still in flight.
    pub fn reset(&mut self) {
        if self.pending.take().is_some() {
            log::info!("Abandoning in-flight analysis");
        }
        self.captured = None;
        self.analysis = None;
        self.label = None;
        self.error = None;
        if self.status != AppStatus::Idle {
            self.enter(AppStatus::Idle);
        }
    }
}
