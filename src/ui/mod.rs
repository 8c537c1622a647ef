// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the ClimbScan application.

pub mod beta_panel;
pub mod camera_view;
pub mod route_view;
pub mod toolbar;
