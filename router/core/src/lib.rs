// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0
//! # NEXIS Router Core
//!
//! Routes a chat request to one of several interchangeable text-generation
//! backends and normalizes every backend's answer into one response shape.
//!
//! # Architecture
//!
//! - **Domain:** chat types, prompt composition, model registry, adapter trait
//! - **Application:** the [`application::dispatcher::ChatDispatcher`] use case
//! - **Infrastructure:** one adapter per upstream protocol
//! - **Presentation:** the axum HTTP surface

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
