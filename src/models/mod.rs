// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model shared by the analysis client, renderer and shell.

pub mod route;
pub mod status;
