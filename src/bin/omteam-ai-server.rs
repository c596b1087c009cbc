// ABOUTME: Server binary for the Omteam AI backend
// ABOUTME: Loads environment configuration, initializes logging and serves the AI endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! # Omteam AI Server Binary
//!
//! Starts the HTTP server that fronts the mission, feedback and coaching agents.

use anyhow::Result;
use clap::Parser;
use omteam_ai_server::{
    config::ServerConfig, constants::routes, logging, resources::ServerResources, server,
};
use std::sync::Arc;
use tracing::{error, info};

/// Command-line overrides for the environment configuration
#[derive(Parser)]
#[command(name = "omteam-ai-server")]
#[command(about = "Omteam AI - mission recommendations, feedback and coaching backed by an LLM")]
pub struct Args {
    /// Override bind address
    #[arg(long)]
    host: Option<String>,

    /// Override HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Container entrypoints sometimes pass arguments clap does not know
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Argument parsing failed: {e}");
            eprintln!("Using environment configuration only");
            Args {
                host: None,
                port: None,
            }
        }
    };

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(host) = args.host {
        config.http.host = host;
    }
    if let Some(port) = args.port {
        config.http.port = port;
    }

    info!("Starting Omteam AI server");
    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::from_config(config)?);

    display_available_endpoints(&resources);

    if let Err(e) = server::run(resources).await {
        error!("Server error: {e}");
        return Err(e);
    }

    Ok(())
}

/// Display all available API endpoints
fn display_available_endpoints(resources: &ServerResources) {
    let http = &resources.config.http;
    let (host, port) = (http.host.as_str(), http.port);

    info!("=== Available API Endpoints ===");
    display_ai_endpoints(host, port);
    if http.legacy_endpoints_enabled {
        display_legacy_endpoints(host, port);
    }
    display_health_endpoints(host, port);
    info!("=== End of Endpoint List ===");
}

fn display_ai_endpoints(host: &str, port: u16) {
    info!("AI:");
    info!("   Unified:           POST http://{host}:{port}{}", routes::AI_CHAT_MESSAGES);
}

#[allow(clippy::cognitive_complexity)]
fn display_legacy_endpoints(host: &str, port: u16) {
    info!("Deprecated (use the unified endpoint):");
    info!("   Daily Missions:    POST http://{host}:{port}{}", routes::LEGACY_DAILY_MISSIONS);
    info!("   Daily Analysis:    POST http://{host}:{port}{}", routes::LEGACY_DAILY_ANALYSIS);
    info!("   Weekly Analysis:   POST http://{host}:{port}{}", routes::LEGACY_WEEKLY_ANALYSIS);
    info!("   Chat Sessions:     POST http://{host}:{port}{}", routes::LEGACY_CHAT_SESSIONS);
}

#[allow(clippy::cognitive_complexity)]
fn display_health_endpoints(host: &str, port: u16) {
    info!("Monitoring:");
    info!("   Health:            GET  http://{host}:{port}{}", routes::HEALTH);
    info!("   Readiness:         GET  http://{host}:{port}{}", routes::READY);
}
