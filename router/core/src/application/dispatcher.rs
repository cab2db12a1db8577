// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0
//! Chat dispatch use case
//!
//! Resolves the model key, composes the prompt, calls the bound adapter once
//! and maps the outcome onto the uniform response. Unknown keys are the only
//! requests rejected outright; adapter failures are always surfaced.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::chat::{ChatRequest, ChatResponse};
use crate::domain::llm::{BackendKind, GenerationOptions, GenerationRequest, LLMError};
use crate::domain::model_registry::ModelRegistry;
use crate::domain::prompt::compose;
use crate::domain::router_config::RouterConfig;
use crate::infrastructure::llm::ProviderRegistry;

/// Why a chat request did not produce a response
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// Client named a key the model table does not contain
    #[error("Unknown model: '{0}'")]
    UnknownModel(String),

    /// The bound backend failed
    #[error("Backend '{backend}' failed for model '{model_key}': {source}")]
    Backend {
        backend: BackendKind,
        model_key: String,
        #[source]
        source: LLMError,
    },
}

impl DispatchError {
    /// Stable machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::UnknownModel(_) => "unknown_model",
            DispatchError::Backend { source, .. } => source.kind(),
        }
    }

    /// HTTP status for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::UnknownModel(_) => 400,
            DispatchError::Backend { .. } => 502,
        }
    }

    /// Offending key or backend-reported text, without the message prefix.
    pub fn detail(&self) -> &str {
        match self {
            DispatchError::UnknownModel(key) => key,
            DispatchError::Backend { source, .. } => source.detail(),
        }
    }
}

/// Routes chat requests to backend adapters
pub struct ChatDispatcher {
    models: ModelRegistry,
    providers: ProviderRegistry,
    default_model: String,
    options: GenerationOptions,
}

impl ChatDispatcher {
    pub fn new(
        models: ModelRegistry,
        providers: ProviderRegistry,
        default_model: impl Into<String>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            models,
            providers,
            default_model: default_model.into(),
            options,
        }
    }

    /// Build a dispatcher and its adapters from prepared configuration
    pub fn from_config(config: &RouterConfig) -> anyhow::Result<Arc<Self>> {
        let models = config.model_registry()?;
        let providers = ProviderRegistry::from_config(config)?;

        info!(
            models = models.len(),
            default_model = %config.default_model,
            "Chat dispatcher ready"
        );

        Ok(Arc::new(Self::new(
            models,
            providers,
            config.default_model.clone(),
            config.generation_options(),
        )))
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Handle one chat request
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatResponse, DispatchError> {
        let request_id = Uuid::new_v4();
        let model_key = request
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());

        let binding = self.models.resolve(&model_key).map_err(|_| {
            warn!(%request_id, model = %model_key, "Rejected request for unknown model");
            DispatchError::UnknownModel(model_key.clone())
        })?;

        let backend = binding.backend;
        let provider = self.providers.get(backend).ok_or_else(|| DispatchError::Backend {
            backend,
            model_key: model_key.clone(),
            source: LLMError::Upstream(format!("No adapter registered for backend '{}'", backend)),
        })?;

        let generation = GenerationRequest {
            model_key: model_key.clone(),
            upstream_model: binding.model.clone(),
            prompt: compose(&request.user_input, &request.files),
            user_input: request.user_input,
            files: request.files,
        };

        info!(
            %request_id,
            model = %model_key,
            %backend,
            upstream_model = %generation.upstream_model,
            files = generation.files.len(),
            "Dispatching chat request"
        );

        match provider.generate(&generation, &self.options).await {
            Ok(response) => {
                info!(
                    %request_id,
                    backend = %response.backend,
                    upstream_model = %response.model,
                    chars = response.text.len(),
                    "Backend answered"
                );
                Ok(ChatResponse {
                    response: response.text,
                })
            }
            Err(source) => {
                warn!(
                    %request_id,
                    %backend,
                    kind = source.kind(),
                    error = %source,
                    "Backend failed"
                );
                Err(DispatchError::Backend {
                    backend,
                    model_key,
                    source,
                })
            }
        }
    }
}
