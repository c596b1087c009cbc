// ABOUTME: HTTP server assembly and lifecycle for the Omteam AI service
// ABOUTME: Builds the layered axum router, serves it and sweeps expired personalization records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! Server assembly
//!
//! Layer order, outermost first: request id, tracing, CORS, deadline backstop,
//! body limit. The pipeline enforces its own deadline so timeouts normally
//! surface from there; the backstop only catches requests that stall outside
//! the pipeline. Both render a `TIMEOUT` envelope, and unknown paths get a
//! `RESOURCE_NOT_FOUND` envelope.

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::Uri;
use axum::{middleware, Extension, Router};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::constants::defaults;
use crate::errors::AppError;
use crate::middleware::{
    request_deadline_middleware, request_id_middleware, setup_cors, RequestId,
};
use crate::personalization::PersonalizationStore;
use crate::resources::ServerResources;
use crate::routes::{AiRoutes, HealthRoutes};

/// Extra seconds the backstop waits past the pipeline deadline
const TIMEOUT_GRACE_SECS: u64 = 5;

/// Build the complete router with all middleware applied
#[must_use]
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let http = &resources.config.http;
    let backstop = Duration::from_secs(http.request_timeout_secs + TIMEOUT_GRACE_SECS);
    let cors = setup_cors(http);
    let body_limit = DefaultBodyLimit::max(http.max_body_bytes);

    Router::new()
        .merge(AiRoutes::routes(Arc::clone(&resources)))
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .fallback(route_not_found)
        .layer(body_limit)
        .layer(middleware::from_fn_with_state(
            backstop,
            request_deadline_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

async fn route_not_found(uri: Uri, request_id: Option<Extension<RequestId>>) -> AppError {
    let error = AppError::not_found(format!("Route {}", uri.path()));
    match request_id {
        Some(Extension(id)) => error.with_request_id(id.as_str()),
        None => error,
    }
}

/// Bind the configured address and serve until SIGINT or SIGTERM
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails
pub async fn run(resources: Arc<ServerResources>) -> Result<()> {
    let addr = format!(
        "{}:{}",
        resources.config.http.host, resources.config.http.port
    );
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Omteam AI server listening on {addr}");

    let janitor = resources
        .personalization
        .as_ref()
        .map(|store| spawn_personalization_janitor(Arc::clone(store)));

    let app = build_router(resources);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error");

    if let Some(shutdown_tx) = janitor {
        // Receiver gone means the task already stopped
        let _ = shutdown_tx.send(()).await;
    }

    info!("Omteam AI server stopped");
    served
}

/// Periodically drop expired personalization records
///
/// Returns the sender that stops the task.
fn spawn_personalization_janitor(store: Arc<PersonalizationStore>) -> mpsc::Sender<()> {
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(defaults::SESSION_SWEEP_INTERVAL_SECS));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let removed = store.purge_expired(Utc::now());
                    if removed > 0 {
                        info!(removed, remaining = store.len(), "Expired personalization records purged");
                    }
                }
                _ = shutdown_rx.recv() => {
                    debug!("Personalization janitor received shutdown signal");
                    break;
                }
            }
        }
    });

    shutdown_tx
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to register SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
