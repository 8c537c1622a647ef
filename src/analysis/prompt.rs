// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Fixed instruction text and output schema for route analysis.

use serde_json::{json, Value};

/// Instruction sent alongside every wall photo.
pub const ROUTE_PROMPT: &str = "Analyze this climbing wall image.
1. Identify a logical, interesting climbing route.
2. Map the holds with coordinates (x, y as percentages 0-100).
3. Determine the difficulty grade (using French 5a-9c or V-scale V0-V17).
4. Provide a \"Beta\" (step-by-step movements).

Important: Return ONLY a JSON object corresponding to the provided schema.
Make sure 'holds' coordinates are accurate to where holds are actually visible in the image.";

/// Response schema in the service's OpenAPI subset.
pub fn route_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "grade": { "type": "STRING" },
            "description": { "type": "STRING" },
            "style": { "type": "STRING" },
            "holds": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "x": { "type": "NUMBER" },
                        "y": { "type": "NUMBER" },
                        "type": {
                            "type": "STRING",
                            "description": "One of: start, hand, foot, top, intermediate"
                        },
                        "description": { "type": "STRING" }
                    },
                    "required": ["x", "y", "type"]
                }
            },
            "beta": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "step": { "type": "NUMBER" },
                        "action": { "type": "STRING" },
                        "description": { "type": "STRING" }
                    }
                }
            }
        },
        "required": ["name", "grade", "holds", "beta"]
    })
}
