// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

// Backend Adapters - Anti-Corruption Layer Implementations
//
// One adapter per upstream protocol. Each translates a GenerationRequest into
// its backend's wire format and classifies that backend's failures.

pub mod github_models;
pub mod gemini;
pub mod tunnel;
pub mod echo;
pub mod registry;

pub use registry::ProviderRegistry;

/// Describe a reqwest transport failure for error text.
pub(crate) fn describe_transport_error(err: &reqwest::Error, timeout: std::time::Duration) -> String {
    if err.is_timeout() {
        format!("Request timed out after {}s", timeout.as_secs())
    } else {
        format!("Connection error: {}", err)
    }
}
