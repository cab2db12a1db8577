// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

//! HTTP server startup

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use nexis_core::application::dispatcher::ChatDispatcher;
use nexis_core::domain::router_config::RouterConfig;
use nexis_core::presentation::api::app_with_cors;

pub async fn run(config_path: Option<PathBuf>, host: Option<String>, port: Option<u16>) -> Result<()> {
    info!("NEXIS router starting (PID: {})", std::process::id());

    // Missing credentials stop the process here, never per request
    let config = RouterConfig::load_or_default(config_path)
        .context("Failed to load configuration")?
        .prepare()
        .context("Configuration is not usable")?;

    let dispatcher =
        ChatDispatcher::from_config(&config).context("Failed to initialize backend adapters")?;

    let app = app_with_cors(dispatcher, &config.server.allowed_origins)
        .context("Failed to build HTTP router")?;

    let addr = format!(
        "{}:{}",
        host.unwrap_or_else(|| config.server.bind_address.clone()),
        port.unwrap_or(config.server.port)
    );
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Router listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Router shutting down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
