// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for NEXIS CLI

pub mod config;
pub mod models;
pub mod serve;

pub use self::config::ConfigCommand;
