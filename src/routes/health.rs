// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Reports service status, environment, build commit and the configured LLM provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! Health check routes for service monitoring
//!
//! Both endpoints answer from local state only and never call the model.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::constants::{routes, service_names};
use crate::resources::ServerResources;

/// Body of `/health` and `/ready`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// `healthy` or `ready`
    pub status: &'static str,
    /// Service name
    pub service: &'static str,
    /// Crate version
    pub version: String,
    /// Deployment environment
    pub environment: String,
    /// Build commit
    pub git_sha: String,
    /// LLM provider identifier
    pub llm_provider: String,
    /// Default model
    pub llm_model: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

impl HealthStatus {
    fn from_resources(status: &'static str, resources: &ServerResources) -> Self {
        Self {
            status,
            service: service_names::OMTEAM_AI_SERVER,
            version: resources.config.app.service_version.clone(),
            environment: resources.config.app.environment.to_string(),
            git_sha: resources.config.app.git_sha.clone(),
            llm_provider: resources.provider.name().to_owned(),
            llm_model: resources.provider.default_model().to_owned(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        async fn health_handler(
            State(resources): State<Arc<ServerResources>>,
        ) -> Json<HealthStatus> {
            Json(HealthStatus::from_resources("healthy", &resources))
        }

        async fn ready_handler(
            State(resources): State<Arc<ServerResources>>,
        ) -> Json<HealthStatus> {
            Json(HealthStatus::from_resources("ready", &resources))
        }

        Router::new()
            .route(routes::HEALTH, get(health_handler))
            .route(routes::READY, get(ready_handler))
            .with_state(resources)
    }
}
