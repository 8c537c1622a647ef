// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Route analysis data structures.
//!
//! This module defines the holds, beta steps and the aggregate route
//! analysis returned by the AI service, plus the mapping from hold roles
//! to marker styling.

use serde::{Deserialize, Deserializer, Serialize};

/// Semantic role of a hold on the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldType {
    Start,
    Hand,
    Foot,
    Top,
    Intermediate,
}

/// Outline drawn for a hold marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    RoundedSquare,
}

/// Render attributes for one hold role. Colours are RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    pub stroke: [u8; 4],
    pub fill: [u8; 4],
    pub glow: bool,
}

impl HoldType {
    /// Marker styling for this role.
    pub fn marker_style(self) -> MarkerStyle {
        match self {
            HoldType::Start => MarkerStyle {
                shape: MarkerShape::Circle,
                stroke: [52, 211, 153, 255],
                fill: [52, 211, 153, 77],
                glow: true,
            },
            HoldType::Top => MarkerStyle {
                shape: MarkerShape::Circle,
                stroke: [251, 113, 133, 255],
                fill: [251, 113, 133, 77],
                glow: true,
            },
            HoldType::Hand => MarkerStyle {
                shape: MarkerShape::RoundedSquare,
                stroke: [129, 140, 248, 255],
                fill: [129, 140, 248, 77],
                glow: true,
            },
            HoldType::Foot => MarkerStyle {
                shape: MarkerShape::RoundedSquare,
                stroke: [34, 211, 238, 255],
                fill: [34, 211, 238, 51],
                glow: false,
            },
            HoldType::Intermediate => MarkerStyle {
                shape: MarkerShape::RoundedSquare,
                stroke: [255, 255, 255, 128],
                fill: [255, 255, 255, 26],
                glow: false,
            },
        }
    }

    /// Hover label for a hold at `index` in the route.
    pub fn node_label(self, index: usize) -> String {
        match self {
            HoldType::Top => "FINAL_OBJ".to_string(),
            HoldType::Start => "ROOT_INIT".to_string(),
            _ => format!("M{}_NODE", index),
        }
    }
}

/// A detected contact point, positioned in percent (0-100) of the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hold {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub hold_type: HoldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One instruction in the movement sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetaStep {
    #[serde(default, deserialize_with = "deserialize_step")]
    pub step: u32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub action: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

/// Complete result of one wall analysis.
///
/// `holds` and `beta` are independent sequences: beta steps never index
/// into holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAnalysis {
    pub name: String,
    pub grade: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub style: String,
    pub holds: Vec<Hold>,
    pub beta: Vec<BetaStep>,
}

impl RouteAnalysis {
    /// Number of holds on the route.
    pub fn hold_count(&self) -> usize {
        self.holds.len()
    }

    /// Whether beta steps are numbered 1..=n in array order.
    pub fn beta_is_sequential(&self) -> bool {
        self.beta
            .iter()
            .enumerate()
            .all(|(i, b)| b.step as usize == i + 1)
    }
}

/// Treat an explicit `null` like a missing text field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept `1`, `1.0` and `"1"` for a step number; `null` reads as 0.
fn deserialize_step<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Float(f64),
        Text(String),
    }

    let value = match Option::<Raw>::deserialize(deserializer)? {
        None => return Ok(0),
        Some(Raw::Int(n)) => n as f64,
        Some(Raw::Float(f)) => f,
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("step is not a number: {:?}", s)))?,
    };

    if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return Err(D::Error::custom(format!("step is not a whole number: {}", value)));
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_type_parses_lowercase() {
        let hold: Hold = serde_json::from_str(r#"{"x":50,"y":90,"type":"start"}"#).unwrap();
        assert_eq!(hold.hold_type, HoldType::Start);
        assert_eq!(hold.x, 50.0);
        assert!(hold.description.is_none());
    }

    #[test]
    fn test_unknown_hold_type_is_rejected() {
        let result: Result<Hold, _> = serde_json::from_str(r#"{"x":1,"y":2,"type":"crimp"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_step_accepts_float_and_string() {
        let a: BetaStep = serde_json::from_str(r#"{"step":2.0,"action":"Reach"}"#).unwrap();
        let b: BetaStep = serde_json::from_str(r#"{"step":"3","action":"Match"}"#).unwrap();
        assert_eq!(a.step, 2);
        assert_eq!(a.description, "");
        assert_eq!(b.step, 3);

        let bad: Result<BetaStep, _> = serde_json::from_str(r#"{"step":1.5}"#);
        assert!(bad.is_err());

        let missing: BetaStep = serde_json::from_str(r#"{"action":"Flag"}"#).unwrap();
        assert_eq!(missing.step, 0);
    }

    #[test]
    fn test_optional_fields_default() {
        let analysis: RouteAnalysis = serde_json::from_str(
            r#"{"name":"Slab","grade":"6a","holds":[],"beta":[]}"#,
        )
        .unwrap();
        assert_eq!(analysis.description, "");
        assert_eq!(analysis.style, "");
    }

    #[test]
    fn test_null_text_fields_and_step_read_as_empty() {
        let analysis: RouteAnalysis = serde_json::from_str(
            r#"{"name":"Slab","grade":"6a","description":null,"style":null,"holds":[],
                "beta":[{"step":null,"action":null,"description":null}]}"#,
        )
        .unwrap();
        assert_eq!(analysis.description, "");
        assert_eq!(analysis.style, "");
        assert_eq!(analysis.beta[0].step, 0);
        assert_eq!(analysis.beta[0].action, "");
        assert_eq!(analysis.beta[0].description, "");
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let result: Result<RouteAnalysis, _> =
            serde_json::from_str(r#"{"name":"Slab","holds":[],"beta":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_start_and_top_are_circles() {
        assert_eq!(HoldType::Start.marker_style().shape, MarkerShape::Circle);
        assert_eq!(HoldType::Top.marker_style().shape, MarkerShape::Circle);
        for t in [HoldType::Hand, HoldType::Foot, HoldType::Intermediate] {
            assert_eq!(t.marker_style().shape, MarkerShape::RoundedSquare);
        }
    }

    #[test]
    fn test_node_labels() {
        assert_eq!(HoldType::Start.node_label(0), "ROOT_INIT");
        assert_eq!(HoldType::Top.node_label(5), "FINAL_OBJ");
        assert_eq!(HoldType::Hand.node_label(3), "M3_NODE");
    }

    #[test]
    fn test_beta_sequence_check() {
        let step = |n| BetaStep { step: n, action: String::new(), description: String::new() };
        let mut analysis = RouteAnalysis {
            name: "x".into(),
            grade: "V1".into(),
            description: String::new(),
            style: String::new(),
            holds: vec![],
            beta: vec![step(1), step(2)],
        };
        assert!(analysis.beta_is_sequential());
        analysis.beta = vec![step(2), step(1)];
        assert!(!analysis.beta_is_sequential());
    }
}
