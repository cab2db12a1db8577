// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Request/response types, prompt composition, the model registry, the
//! backend adapter interface and the router configuration schema.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Pure types and rules; no network I/O

pub mod chat;
pub mod prompt;
pub mod model_registry;
pub mod llm;
pub mod router_config;
