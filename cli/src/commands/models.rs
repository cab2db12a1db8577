// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

//! Model table listing

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use nexis_core::domain::router_config::RouterConfig;

pub async fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config = RouterConfig::load_or_default(config_path)
        .context("Failed to load configuration")?;
    let registry = config.model_registry().context("Invalid model table")?;

    println!("{}", "Models:".bold());
    for key in registry.keys() {
        let binding = registry.resolve(&key)?;
        let marker = if key == config.default_model {
            " (default)".green().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} → {} ({}){}",
            key.bold(),
            binding.model,
            binding.backend,
            marker
        );
    }

    Ok(())
}
