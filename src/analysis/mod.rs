// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Route analysis client.
//!
//! Builds a single structured-output request from a snapshot and the fixed
//! route prompt, hands it to a [`ContentGenerator`], and decodes the reply
//! into a [`RouteAnalysis`]. Decoding is all-or-nothing and nothing is
//! retried.

pub mod gemini;
pub mod prompt;

use crate::error::AnalysisError;
use crate::models::route::RouteAnalysis;
use serde_json::Value;

/// One photo plus instruction, ready to send.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    pub image_base64: String,
    pub mime_type: String,
    pub schema: Value,
}

impl GenerateRequest {
    /// Route request for a base64 JPEG.
    pub fn new(image_base64: impl Into<String>) -> Self {
        Self {
            prompt: prompt::ROUTE_PROMPT.to_string(),
            image_base64: image_base64.into(),
            mime_type: "image/jpeg".to_string(),
            schema: prompt::route_schema(),
        }
    }
}

/// Backend that turns a request into the model's text output.
///
/// `Ok(None)` means the service answered without any text.
pub trait ContentGenerator: Send + Sync {
    fn generate(&self, request: &GenerateRequest) -> Result<Option<String>, AnalysisError>;
}

/// Anything that can analyse a wall photo.
pub trait RouteAnalyzer: Send + Sync {
    fn analyze(&self, image_base64: &str) -> Result<RouteAnalysis, AnalysisError>;
}

/// Analysis client over an injected generator.
pub struct AnalysisClient<G: ContentGenerator> {
    generator: G,
}

impl<G: ContentGenerator> AnalysisClient<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }
}

impl<G: ContentGenerator> RouteAnalyzer for AnalysisClient<G> {
    fn analyze(&self, image_base64: &str) -> Result<RouteAnalysis, AnalysisError> {
        let request = GenerateRequest::new(image_base64);
        let text = self.generator.generate(&request)?;
        let analysis = parse_route_analysis(text.as_deref())?;

        log::info!(
            "Analysis received: {} ({}), {} holds, {} beta steps",
            analysis.name,
            analysis.grade,
            analysis.holds.len(),
            analysis.beta.len()
        );
        if !analysis.beta_is_sequential() {
            log::warn!("Beta steps are not numbered 1..n; showing them in received order");
        }
        Ok(analysis)
    }
}

/// Decode the model's text output.
pub fn parse_route_analysis(text: Option<&str>) -> Result<RouteAnalysis, AnalysisError> {
    let text = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Err(AnalysisError::EmptyResponse),
    };

    serde_json::from_str(text).map_err(|e| {
        log::error!("Failed to parse AI response: {} -- payload: {}", e, text);
        AnalysisError::InvalidFormat(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::route::HoldType;
    use std::sync::Mutex;

    const CRIMSON_ARETE: &str = r#"{"name":"Crimson Arete","grade":"V4","description":"...","style":"Technical","holds":[{"x":50,"y":90,"type":"start"},{"x":55,"y":10,"type":"top"}],"beta":[{"step":1,"action":"Start","description":"Match both hands."}]}"#;

    /// Generator that replays a canned reply and records what it was sent.
    struct CannedGenerator {
        reply: Result<Option<String>, fn() -> AnalysisError>,
        seen: Mutex<Vec<GenerateRequest>>,
    }

    impl CannedGenerator {
        fn text(text: &str) -> Self {
            Self { reply: Ok(Some(text.to_string())), seen: Mutex::new(Vec::new()) }
        }

        fn empty() -> Self {
            Self { reply: Ok(None), seen: Mutex::new(Vec::new()) }
        }

        fn failing(make: fn() -> AnalysisError) -> Self {
            Self { reply: Err(make), seen: Mutex::new(Vec::new()) }
        }
    }

    impl ContentGenerator for CannedGenerator {
        fn generate(&self, request: &GenerateRequest) -> Result<Option<String>, AnalysisError> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    #[test]
    fn test_parse_matches_direct_decode() {
        let client = AnalysisClient::new(CannedGenerator::text(CRIMSON_ARETE));
        let analysis = client.analyze("/9j/4AAQ").unwrap();

        let expected: RouteAnalysis = serde_json::from_str(CRIMSON_ARETE).unwrap();
        assert_eq!(analysis, expected);
        assert_eq!(analysis.holds.len(), 2);
        assert_eq!(analysis.beta.len(), 1);
        assert_eq!(analysis.holds[0].hold_type, HoldType::Start);
    }

    #[test]
    fn test_request_carries_image_and_prompt() {
        let generator = CannedGenerator::text(CRIMSON_ARETE);
        let client = AnalysisClient::new(generator);
        client.analyze("/9j/4AAQ").unwrap();

        let seen = client.generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].image_base64, "/9j/4AAQ");
        assert_eq!(seen[0].mime_type, "image/jpeg");
        assert_eq!(seen[0].prompt, prompt::ROUTE_PROMPT);
    }

    #[test]
    fn test_empty_payload() {
        let client = AnalysisClient::new(CannedGenerator::empty());
        assert!(matches!(client.analyze("/9j/"), Err(AnalysisError::EmptyResponse)));

        assert!(matches!(parse_route_analysis(Some("  \n")), Err(AnalysisError::EmptyResponse)));
    }

    #[test]
    fn test_invalid_payload() {
        let client = AnalysisClient::new(CannedGenerator::text("{\"name\": \"Half"));
        let err = client.analyze("/9j/").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidFormat(_)));
        assert_eq!(err.to_string(), "Invalid response format from the AI service");
    }

    #[test]
    fn test_missing_mandatory_field_is_format_error() {
        let text = r#"{"name":"No Grade","holds":[],"beta":[]}"#;
        assert!(matches!(
            parse_route_analysis(Some(text)),
            Err(AnalysisError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_service_error_passes_through() {
        let client = AnalysisClient::new(CannedGenerator::failing(|| {
            AnalysisError::Network("connection refused".into())
        }));
        assert!(matches!(client.analyze("/9j/"), Err(AnalysisError::Network(_))));
    }
}
