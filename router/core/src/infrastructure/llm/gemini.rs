// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

// Gemini Adapter
//
// Anti-Corruption Layer for the Google generateContent API. The upstream model
// name is only a path parameter; every Gemini variant shares this code path.

use crate::domain::llm::{
    BackendKind, GenerationOptions, GenerationRequest, GenerationResponse, LLMError, LLMProvider,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::describe_transport_error;

/// Returned when Gemini answers without any text.
pub const NO_TEXT_PLACEHOLDER: &str = "The model returned no text for this request.";

pub struct GeminiAdapter {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
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
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any.
    fn text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl GeminiAdapter {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl LLMProvider for GeminiAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::Gemini
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, LLMError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
        };

        let url = self.generate_url(&request.upstream_model);
        debug!(model = %request.upstream_model, "Calling Gemini generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .timeout(options.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| LLMError::Upstream(describe_transport_error(&e, options.timeout)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LLMError::Upstream(describe_transport_error(&e, options.timeout)))?;

        if !status.is_success() {
            warn!(model = %request.upstream_model, %status, "Gemini returned an error");
            return Err(LLMError::Upstream(format!("HTTP {}: {}", status.as_u16(), text)));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| LLMError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

        let output = match parsed.text() {
            Some(output) => output,
            None => {
                warn!(model = %request.upstream_model, "Gemini produced no text");
                NO_TEXT_PLACEHOLDER.to_string()
            }
        };

        Ok(GenerationResponse::new(
            output,
            BackendKind::Gemini,
            request.upstream_model.clone(),
        ))
    }
}
