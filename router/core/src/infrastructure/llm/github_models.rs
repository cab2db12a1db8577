// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

// GitHub Models Adapter
//
// Anti-Corruption Layer for the GitHub Models chat-completions API.
// Any OpenAI-compatible endpoint works the same way.

use crate::domain::llm::{
    BackendKind, GenerationOptions, GenerationRequest, GenerationResponse, LLMError, LLMProvider,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::describe_transport_error;

pub struct GithubModelsAdapter {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    system_prompt: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl GithubModelsAdapter {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        token: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
            system_prompt: system_prompt.into(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl LLMProvider for GithubModelsAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::GithubModels
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, LLMError> {
        let body = ChatCompletionRequest {
            model: &request.upstream_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let url = self.completions_url();
        debug!(model = %request.upstream_model, %url, "Calling GitHub Models");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json")
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
            warn!(model = %request.upstream_model, %status, "GitHub Models returned an error");
            return Err(LLMError::Upstream(format!("HTTP {}: {}", status.as_u16(), text)));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| LLMError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| {
                LLMError::MalformedResponse("Response has no choices[0].message.content".into())
            })?;

        Ok(GenerationResponse::new(
            content,
            BackendKind::GithubModels,
            request.upstream_model.clone(),
        ))
    }
}
