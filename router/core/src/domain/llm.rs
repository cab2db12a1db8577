// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0
//! Llm
//!
//! Backend adapter interface shared by every upstream protocol.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Isolates dispatch logic from vendor wire formats

// Backend Adapter Domain Interface (Anti-Corruption Layer)
//
// Each upstream protocol gets one adapter in infrastructure/llm/. Adapters
// classify every transport failure themselves and return an LLMError; nothing
// raw leaves an adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::chat::FileRef;

/// Upstream protocol family a model key is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Chat-completions style HTTP API (GitHub Models)
    GithubModels,

    /// Google generative-text API
    Gemini,

    /// Self-hosted model behind an ephemeral tunnel URL
    Tunnel,

    /// Local echo, no outbound call
    Echo,
}

impl BackendKind {
    pub const ALL: [BackendKind; 4] = [
        BackendKind::GithubModels,
        BackendKind::Gemini,
        BackendKind::Tunnel,
        BackendKind::Echo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::GithubModels => "github-models",
            BackendKind::Gemini => "gemini",
            BackendKind::Tunnel => "tunnel",
            BackendKind::Echo => "echo",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything an adapter may need about one request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Public key the client selected (e.g. "tinyllama")
    pub model_key: String,

    /// Backend-specific model identifier (e.g. "gemini-1.5-pro")
    pub upstream_model: String,

    /// User input with the attachment block folded in
    pub prompt: String,

    /// User input exactly as received
    pub user_input: String,

    /// Attachment metadata exactly as received
    pub files: Vec<FileRef>,
}

/// Options for one generation call
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on the outbound call
    pub timeout: Duration,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.7,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationResponse {
    /// Generated text
    pub text: String,

    /// Backend that produced the text
    pub backend: BackendKind,

    /// Upstream model used
    pub model: String,
}

impl GenerationResponse {
    pub fn new(text: impl Into<String>, backend: BackendKind, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            backend,
            model: model.into(),
        }
    }
}

/// Hard failures an adapter can report.
///
/// Soft degradations are not errors: an adapter that chooses to degrade
/// returns `Ok` with a user-facing notice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LLMError {
    /// Non-success status, timeout or transport failure
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Backend answered successfully but the body broke its contract
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl LLMError {
    /// Stable machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            LLMError::Upstream(_) => "upstream_error",
            LLMError::MalformedResponse(_) => "malformed_response",
        }
    }

    /// Backend-reported text without the kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            LLMError::Upstream(detail) | LLMError::MalformedResponse(detail) => detail,
        }
    }
}

/// Domain interface for text-generation backends
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Backend kind this adapter speaks
    fn kind(&self) -> BackendKind;

    /// Perform exactly one generation call
    async fn generate(
        &self,
        request: &GenerationRequest,
        options: &GenerationOptions,
    ) -> Result<GenerationResponse, LLMError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_serde_names() {
        for kind in BackendKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        let parsed: BackendKind = serde_json::from_str("\"github-models\"").unwrap();
        assert_eq!(parsed, BackendKind::GithubModels);
    }

    #[test]
    fn test_error_kinds() {
        let upstream = LLMError::Upstream("HTTP 500: boom".into());
        assert_eq!(upstream.kind(), "upstream_error");
        assert_eq!(upstream.detail(), "HTTP 500: boom");
        assert_eq!(upstream.to_string(), "Upstream error: HTTP 500: boom");

        let malformed = LLMError::MalformedResponse("missing content".into());
        assert_eq!(malformed.kind(), "malformed_response");
    }
}
