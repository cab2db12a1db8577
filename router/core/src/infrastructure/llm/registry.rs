// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

// Adapter Registry - Backend Kind to Adapter Lookup
//
// Builds one adapter per backend kind the model table uses. Network adapters
// share a single connection-pooling HTTP client. No retries and no fallback:
// every call reaches exactly one adapter once.

use crate::domain::llm::{BackendKind, LLMProvider};
use crate::domain::router_config::RouterConfig;
use anyhow::Context;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::echo::EchoAdapter;
use super::gemini::GeminiAdapter;
use super::github_models::GithubModelsAdapter;
use super::tunnel::TunnelAdapter;

/// Registry of backend adapters keyed by kind
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<BackendKind, Arc<dyn LLMProvider>>,
}

impl ProviderRegistry {
    /// Empty registry, filled with [`with_provider`](Self::with_provider)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create adapters for every backend kind the model table references.
    ///
    /// `config` must already have its secrets resolved.
    pub fn from_config(config: &RouterConfig) -> anyhow::Result<Self> {
        let kinds = config
            .model_registry()
            .context("Invalid model table")?
            .backends();

        let client = reqwest::Client::builder()
            .user_agent(concat!("nexis-router/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        info!("Initializing backend adapters");

        let mut registry = Self::new();
        for kind in kinds {
            info!("Initializing adapter: {}", kind);
            let provider = Self::create_provider(kind, config, &client)?;
            registry.providers.insert(kind, provider);
        }

        info!(kinds = ?registry.kinds(), "Backend adapters ready");

        Ok(registry)
    }

    /// Create a single adapter from configuration
    fn create_provider(
        kind: BackendKind,
        config: &RouterConfig,
        client: &reqwest::Client,
    ) -> anyhow::Result<Arc<dyn LLMProvider>> {
        let backends = &config.backends;

        let provider: Arc<dyn LLMProvider> = match kind {
            BackendKind::GithubModels => {
                let token = require(&backends.github_models.token, "backends.github_models.token")?;
                Arc::new(GithubModelsAdapter::new(
                    client.clone(),
                    backends.github_models.endpoint.clone(),
                    token,
                    backends.github_models.system_prompt.clone(),
                ))
            }
            BackendKind::Gemini => {
                let api_key = require(&backends.gemini.api_key, "backends.gemini.api_key")?;
                Arc::new(GeminiAdapter::new(
                    client.clone(),
                    backends.gemini.endpoint.clone(),
                    api_key,
                ))
            }
            BackendKind::Tunnel => {
                let base_url = require(&backends.tunnel.base_url, "backends.tunnel.base_url")?;
                Arc::new(TunnelAdapter::new(client.clone(), base_url))
            }
            BackendKind::Echo => Arc::new(EchoAdapter::new()),
        };

        Ok(provider)
    }

    /// Register or replace the adapter for its kind
    pub fn with_provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    /// Adapter for a backend kind
    pub fn get(&self, kind: BackendKind) -> Option<Arc<dyn LLMProvider>> {
        self.providers.get(&kind).cloned()
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<BackendKind> {
        let mut kinds: Vec<BackendKind> = self.providers.keys().copied().collect();
        kinds.sort();
        kinds
    }
}

fn require(value: &Option<String>, field: &str) -> anyhow::Result<String> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => anyhow::bail!("{} is not set", field),
    }
}
