// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use nexis_core::domain::router_config::RouterConfig;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file, including credentials
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./nexis-config.yaml)
        #[arg(short, long, default_value = "./nexis-config.yaml")]
        output: PathBuf,

        /// Write the commented example instead of bare defaults
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(&output, examples).await,
    }
}

/// Print a credential without revealing it.
fn mask(value: &Option<String>) -> String {
    match value.as_deref() {
        None | Some("") => "(not set)".to_string(),
        Some(v) if v.starts_with("env:") => v.to_string(),
        Some(_) => "********".to_string(),
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = RouterConfig::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  --config flag: {}", path.display());
        } else {
            println!("  --config flag: {}", "(not set)".dimmed());
        }
        for (i, path) in RouterConfig::candidate_paths().iter().enumerate() {
            println!("  {}. {}", i + 1, path.display());
        }
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Server:".bold());
    println!("  Bind: {}:{}", config.server.bind_address, config.server.port);
    println!("  Allowed origins: {}", config.server.allowed_origins.join(", "));
    println!();

    println!("{}", "Backends:".bold());
    let github = &config.backends.github_models;
    println!("  {}", "github-models".bold());
    println!("    Endpoint: {}", github.endpoint);
    println!("    Token: {}", mask(&github.token));
    println!("    Max tokens: {}, temperature: {}", github.max_tokens, github.temperature);
    println!("  {}", "gemini".bold());
    println!("    Endpoint: {}", config.backends.gemini.endpoint);
    println!("    API key: {}", mask(&config.backends.gemini.api_key));
    println!("  {}", "tunnel".bold());
    println!(
        "    Base URL: {}",
        config.backends.tunnel.base_url.as_deref().unwrap_or("(not set)")
    );
    println!();

    println!("{}", "Models:".bold());
    println!("  Default: {}", config.default_model);
    println!("  Timeout: {}s", config.timeout_seconds);
    for model in &config.models {
        println!("    - {} → {} ({})", model.key, model.model, model.backend);
    }
    println!();

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    RouterConfig::load_or_default(config_path)
        .context("Failed to load configuration")?
        .prepare()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: &Path, with_examples: bool) -> Result<()> {
    write_sample(output, with_examples)?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

fn write_sample(output: &Path, with_examples: bool) -> Result<()> {
    if with_examples {
        std::fs::write(output, include_str!("../../templates/config-with-examples.yaml"))
            .with_context(|| format!("Failed to write config to {:?}", output))
    } else {
        RouterConfig::default()
            .to_yaml_file(output)
            .with_context(|| format!("Failed to write config to {:?}", output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_samples_parse_and_validate() {
        let dir = tempfile::tempdir().unwrap();

        for with_examples in [false, true] {
            let path = dir.path().join(format!("sample-{}.yaml", with_examples));
            write_sample(&path, with_examples).unwrap();

            let config = RouterConfig::from_yaml_file(&path).unwrap();
            config.validate().unwrap();
        }
    }

    #[test]
    fn test_mask_hides_literal_secrets() {
        assert_eq!(mask(&Some("ghp_secret".into())), "********");
        assert_eq!(mask(&Some("env:GITHUB_TOKEN".into())), "env:GITHUB_TOKEN");
        assert_eq!(mask(&None), "(not set)");
    }
}
