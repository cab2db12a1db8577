// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0
//! Chat
//!
//! Inbound request and outbound response shapes shared by every backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name used for attachments that arrive without one.
pub const UNKNOWN_FILE_NAME: &str = "unknown";

/// A single chat request as received from a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Free-text prompt. Required, may be empty.
    pub user_input: String,

    /// Public model key. Falls back to the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Attachment metadata, in the order the client sent it.
    #[serde(default)]
    pub files: Vec<FileRef>,
}

impl ChatRequest {
    pub fn new(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            model: None,
            files: Vec::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_files(mut self, files: Vec<FileRef>) -> Self {
        self.files = files;
        self
    }
}

/// Attachment metadata. Only `name` is read; every other attribute is kept
/// untouched so it can be forwarded to backends that want it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            extra: Map::new(),
        }
    }

    /// The attachment name, or `"unknown"` when the client sent none.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_FILE_NAME)
    }
}

/// The one response shape returned for every backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}
