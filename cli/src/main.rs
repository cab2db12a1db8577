// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

//! # NEXIS Router CLI
//!
//! The `nexis` binary hosts the chat router.
//!
//! ## Commands
//!
//! - `nexis serve` - Run the HTTP API (`GET /`, `POST /chat`, `GET /models`)
//! - `nexis config show|validate|generate` - Configuration management
//! - `nexis models` - Print the model table

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nexis_router::commands::{self, ConfigCommand};
use nexis_router::logging;

/// NEXIS AI chat router
#[derive(Parser)]
#[command(name = "nexis")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "NEXIS_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "NEXIS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output format (text, json)
    #[arg(long, global = true, env = "NEXIS_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    #[command(name = "serve")]
    Serve {
        /// Bind address (default: from configuration)
        #[arg(long, env = "NEXIS_HOST")]
        host: Option<String>,

        /// HTTP port (default: from configuration)
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Print the model table
    #[command(name = "models")]
    Models,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env values never override variables already set
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let file_logging = logging::file_settings(cli.config.clone());
    logging::init_logging(
        cli.log_level.as_deref().unwrap_or(&file_logging.level),
        cli.log_format.as_deref().unwrap_or(&file_logging.format),
    )?;

    match cli.command {
        Commands::Serve { host, port } => commands::serve::run(cli.config, host, port).await,
        Commands::Config { command } => commands::config::handle_command(command, cli.config).await,
        Commands::Models => commands::models::run(cli.config).await,
    }
}
