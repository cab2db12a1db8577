// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

// Model Registry - Public Model Key Resolution
//
// Maps the key a client sends ("tinyllama", "gemini-1.5-pro", ...) to the
// backend that serves it and the upstream model name. Built once at startup,
// read-only afterwards. Lookups are exact and case-sensitive.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::llm::BackendKind;

/// Upstream model name the echo backend uses for a plain echo.
pub const ECHO_MODEL: &str = "echo";

/// Upstream model name the echo backend uses for keys with no real backend yet.
pub const UNIMPLEMENTED_MODEL: &str = "unimplemented";

/// Backend identity and upstream model name for one public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendBinding {
    pub backend: BackendKind,
    pub model: String,
}

impl BackendBinding {
    pub fn new(backend: BackendKind, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }
}

/// One row of the model table as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelBinding {
    /// Public key clients send
    pub key: String,

    /// Backend serving the key
    pub backend: BackendKind,

    /// Model identifier passed to the backend
    pub model: String,
}

impl ModelBinding {
    pub fn new(key: impl Into<String>, backend: BackendKind, model: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            backend,
            model: model.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Unknown model: '{0}'")]
    UnknownModel(String),

    #[error("Duplicate model key: '{0}'")]
    DuplicateKey(String),

    #[error("Model key cannot be empty")]
    EmptyKey,

    #[error("Upstream model cannot be empty for key '{0}'")]
    EmptyModel(String),

    #[error("Echo binding '{key}' uses unsupported model '{model}' (expected 'echo' or 'unimplemented')")]
    InvalidEchoModel { key: String, model: String },
}

/// Immutable key -> binding table
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    bindings: HashMap<String, BackendBinding>,
}

impl ModelRegistry {
    /// Build the table, rejecting empty and duplicate keys.
    pub fn from_bindings<'a>(
        rows: impl IntoIterator<Item = &'a ModelBinding>,
    ) -> Result<Self, RegistryError> {
        let mut bindings = HashMap::new();

        for row in rows {
            if row.key.is_empty() {
                return Err(RegistryError::EmptyKey);
            }
            if row.model.is_empty() {
                return Err(RegistryError::EmptyModel(row.key.clone()));
            }
            if row.backend == BackendKind::Echo
                && row.model != ECHO_MODEL
                && row.model != UNIMPLEMENTED_MODEL
            {
                return Err(RegistryError::InvalidEchoModel {
                    key: row.key.clone(),
                    model: row.model.clone(),
                });
            }
            if bindings
                .insert(row.key.clone(), BackendBinding::new(row.backend, row.model.clone()))
                .is_some()
            {
                return Err(RegistryError::DuplicateKey(row.key.clone()));
            }
        }

        Ok(Self { bindings })
    }

    /// Resolve a public key to its binding.
    pub fn resolve(&self, model_key: &str) -> Result<&BackendBinding, RegistryError> {
        self.bindings
            .get(model_key)
            .ok_or_else(|| RegistryError::UnknownModel(model_key.to_string()))
    }

    pub fn contains(&self, model_key: &str) -> bool {
        self.bindings.contains_key(model_key)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.bindings.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Backend kinds referenced by at least one key.
    pub fn backends(&self) -> BTreeSet<BackendKind> {
        self.bindings.values().map(|b| b.backend).collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Model table used when configuration provides none.
pub fn default_model_bindings() -> Vec<ModelBinding> {
    vec![
        ModelBinding::new("tinyllama", BackendKind::Echo, ECHO_MODEL),
        ModelBinding::new("qwen", BackendKind::Tunnel, "qwen"),
        ModelBinding::new("gpt-4o-mini", BackendKind::GithubModels, "openai/gpt-4o-mini"),
        ModelBinding::new("gemini-1.5-pro", BackendKind::Gemini, "gemini-1.5-pro"),
        ModelBinding::new("gemini-1.5-flash", BackendKind::Gemini, "gemini-1.5-flash"),
        ModelBinding::new("gemini-2.0-flash", BackendKind::Gemini, "gemini-2.0-flash"),
        ModelBinding::new("phi-3", BackendKind::Echo, UNIMPLEMENTED_MODEL),
    ]
}
