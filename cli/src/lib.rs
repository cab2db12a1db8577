// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0
//! NEXIS CLI library - exposes testable components
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Command handlers and logging bootstrap for the `nexis` binary

pub mod commands;
pub mod logging;
