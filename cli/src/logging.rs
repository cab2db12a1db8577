// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

//! Tracing subscriber setup

use anyhow::{Context, Result};
use nexis_core::domain::router_config::{LoggingConfig, RouterConfig};
use std::path::PathBuf;

/// Logging settings from the configuration file, without failing.
///
/// Runs before the subscriber exists, so problems loading the file are left
/// for the command itself to report.
pub fn file_settings(config_path: Option<PathBuf>) -> LoggingConfig {
    RouterConfig::load_or_default(config_path)
        .map(|config| config.logging)
        .unwrap_or_default()
}

/// Initialize tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        "json" => builder.json().init(),
        "text" => builder.compact().init(),
        other => anyhow::bail!("Unknown log format '{}'. Expected 'text' or 'json'", other),
    }

    Ok(())
}
