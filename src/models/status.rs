// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application status values.

use std::fmt;

/// Which surface the application is showing. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppStatus {
    #[default]
    Idle,
    Camera,
    Analyzing,
    Results,
    Error,
}

impl fmt::Display for AppStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppStatus::Idle => "idle",
            AppStatus::Camera => "camera",
            AppStatus::Analyzing => "analyzing",
            AppStatus::Results => "results",
            AppStatus::Error => "error",
        };
        f.write_str(name)
    }
}
