// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Gemini `generateContent` transport.
//!
//! Blocking on purpose: the app calls it from a worker thread, never from
//! the UI thread.

use super::{ContentGenerator, GenerateRequest};
use crate::config::ApiConfig;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// HTTP client for one model, holding its credential.
pub struct GeminiTransport {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Inline { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl GeminiTransport {
    pub fn new(config: &ApiConfig, api_key: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

/// Request body for one photo plus instruction.
fn build_body(request: &GenerateRequest) -> ApiRequest<'_> {
    ApiRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: &request.prompt },
                Part::Inline {
                    inline_data: InlineData {
                        mime_type: &request.mime_type,
                        data: &request.image_base64,
                    },
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: &request.schema,
        },
    }
}

/// Concatenated text of the first candidate, if any.
fn extract_text(response: ApiResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn service_error(status: u16, body: &str) -> AnalysisError {
    let message = serde_json::from_str::<ApiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    AnalysisError::Service { status, message }
}

impl ContentGenerator for GeminiTransport {
    fn generate(&self, request: &GenerateRequest) -> Result<Option<String>, AnalysisError> {
        log::info!("Requesting route analysis from {}", self.model);

        let response = self
            .agent
            .post(&self.url())
            .set("x-goog-api-key", &self.api_key)
            .set("content-type", "application/json")
            .send_json(build_body(request));

        match response {
            Ok(resp) => {
                let body: ApiResponse = resp
                    .into_json()
                    .map_err(|e| AnalysisError::Network(format!("unreadable reply: {}", e)))?;
                Ok(extract_text(body))
            }
            Err(ureq::Error::Status(status, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(service_error(status, &body))
            }
            Err(ureq::Error::Transport(t)) => Err(AnalysisError::Network(t.to_string())),
        }
    }
}
