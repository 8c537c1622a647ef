// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Route analysis export.
//!
//! This module writes the current analysis to disk in YAML or JSON format.

use crate::models::route::RouteAnalysis;
use anyhow::{bail, Result};
use std::path::Path;

/// Export an analysis to YAML format.
pub fn export_yaml(data: &RouteAnalysis, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export an analysis to JSON format.
pub fn export_json(data: &RouteAnalysis, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Export using the format implied by the file extension.
pub fn export_by_extension(data: &RouteAnalysis, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(data, path),
        Some("json") => export_json(data, path),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::route::{BetaStep, Hold, HoldType};

    fn sample() -> RouteAnalysis {
        RouteAnalysis {
            name: "Crimson Arete".into(),
            grade: "V4".into(),
            description: "Steep arete".into(),
            style: "Technical".into(),
            holds: vec![
                Hold { x: 50.0, y: 90.0, hold_type: HoldType::Start, description: None },
                Hold {
                    x: 55.0,
                    y: 10.0,
                    hold_type: HoldType::Top,
                    description: Some("Jug".into()),
                },
            ],
            beta: vec![BetaStep {
                step: 1,
                action: "Start".into(),
                description: "Match both hands.".into(),
            }],
        }
    }

    #[test]
    fn test_yaml_export_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("route.yaml");
        export_by_extension(&sample(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let loaded: RouteAnalysis = serde_yaml::from_str(&text).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_json_export_uses_wire_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("route.json");
        export_by_extension(&sample(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"type\": \"start\""));
        let loaded: RouteAnalysis = serde_json::from_str(&text).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("route.txt");
        assert!(export_by_extension(&sample(), &path).is_err());
    }
}
