// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

// Echo Adapter
//
// Local stand-in backend. Answers without leaving the process, and doubles as
// the placeholder for keys whose real backend does not exist yet.

use crate::domain::llm::{
    BackendKind, GenerationOptions, GenerationRequest, GenerationResponse, LLMError, LLMProvider,
};
use crate::domain::model_registry::UNIMPLEMENTED_MODEL;
use async_trait::async_trait;

#[derive(Debug, Default, Clone, Copy)]
pub struct EchoAdapter;

impl EchoAdapter {
    pub fn new() -> Self {
        Self
    }

    /// The echo text for a request. Pure.
    pub fn render(request: &GenerationRequest) -> String {
        let tag = request.model_key.to_uppercase();

        if request.upstream_model == UNIMPLEMENTED_MODEL {
            return format!(
                "[{}]: The '{}' model is not implemented yet.",
                tag, request.model_key
            );
        }

        let mut text = format!("[{}]: Echo - {}", tag, request.user_input);
        if !request.files.is_empty() {
            text.push_str(&format!("\nFiles received: {} files", request.files.len()));
        }
        text
    }
}

#[async_trait]
impl LLMProvider for EchoAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::Echo
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        _options: &GenerationOptions,
    ) -> Result<GenerationResponse, LLMError> {
        Ok(GenerationResponse::new(
            Self::render(request),
            BackendKind::Echo,
            request.upstream_model.clone(),
        ))
    }
}
