// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings come from an optional YAML file; every field has a default.
//! The API key may also be supplied through `GEMINI_API_KEY` or `API_KEY`.

use crate::capture::Resolution;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "climbscan.yaml";

const KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub camera: CameraConfig,
    pub capture: CaptureConfig,
    /// Credential for the analysis service. Prefer the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Analysis service endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Camera device selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub index: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: Resolution::PREFERRED.width,
            height: Resolution::PREFERRED.height,
        }
    }
}

/// Snapshot encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub jpeg_quality: u8,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: crate::capture::DEFAULT_JPEG_QUALITY,
        }
    }
}

impl AppConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists.
    /// Falls back to defaults when no file is present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    log::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                default
            }
        };

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.capture.jpeg_quality) {
            bail!("capture.jpeg_quality must be between 1 and 100");
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            bail!("camera.width and camera.height must be non-zero");
        }
        Ok(())
    }

    /// Resolve the API key, environment first.
    pub fn resolve_api_key(&self) -> Result<String> {
        resolve_key(|name| std::env::var(name).ok(), self.api_key.as_deref())
    }

    /// Preferred camera resolution.
    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.camera.width,
            height: self.camera.height,
        }
    }
}

fn resolve_key(env: impl Fn(&str) -> Option<String>, file: Option<&str>) -> Result<String> {
    KEY_VARS
        .iter()
        .filter_map(|name| env(name))
        .chain(file.map(str::to_string))
        .map(|k| k.trim().to_string())
        .find(|k| !k.is_empty())
        .with_context(|| {
            format!(
                "No API key configured. Set {} or api_key in {}",
                KEY_VARS.join(" or "),
                DEFAULT_CONFIG_FILE
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.model, "gemini-3-flash-preview");
        assert_eq!(config.capture.jpeg_quality, 90);
        assert_eq!(config.resolution(), Resolution::PREFERRED);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml("api:\n  model: gemini-pro\ncamera:\n  index: 2\n").unwrap();
        assert_eq!(config.api.model, "gemini-pro");
        assert_eq!(config.api.timeout_secs, 60);
        assert_eq!(config.camera.index, 2);
        assert_eq!(config.camera.width, 1920);
    }

    #[test]
    fn test_invalid_quality_rejected() {
        assert!(AppConfig::from_yaml("capture:\n  jpeg_quality: 0\n").is_err());
    }

    #[test]
    fn test_key_resolution_order() {
        let env = |name: &str| match name {
            "API_KEY" => Some("from-api-key".to_string()),
            _ => None,
        };
        assert_eq!(resolve_key(env, Some("from-file")).unwrap(), "from-api-key");

        let gemini_first = |name: &str| Some(format!("{}-value", name));
        assert_eq!(resolve_key(gemini_first, None).unwrap(), "GEMINI_API_KEY-value");

        assert_eq!(resolve_key(|_| None, Some("from-file")).unwrap(), "from-file");
        assert!(resolve_key(|_| Some("  ".to_string()), None).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("climbscan.yaml");
        std::fs::write(&path, "api_key: abc\napi:\n  timeout_secs: 5\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api_key.as_deref(), Some("abc"));
    }
}
