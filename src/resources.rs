// ABOUTME: Centralized shared resources handed to every request handler
// ABOUTME: Owns configuration, the LLM provider, the AI pipeline and the personalization store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use std::sync::Arc;
use std::time::Duration;

use crate::agents::{AgentRuntime, AiPipeline, Orchestrator};
use crate::config::ServerConfig;
use crate::errors::AppResult;
use crate::llm::{create_provider, SharedLlmProvider};
use crate::personalization::PersonalizationStore;

/// Centralized resource container
///
/// Built once at startup and shared through `Arc`. Everything except the
/// personalization store is immutable after construction.
#[derive(Clone)]
pub struct ServerResources {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Shared model provider
    pub provider: SharedLlmProvider,
    /// Request pipeline
    pub pipeline: Arc<AiPipeline>,
    /// Per-user memory, absent when disabled
    pub personalization: Option<Arc<PersonalizationStore>>,
}

impl ServerResources {
    /// Assemble resources around an existing provider
    #[must_use]
    pub fn new(config: ServerConfig, provider: SharedLlmProvider) -> Self {
        let personalization = config
            .session
            .enabled
            .then(|| Arc::new(PersonalizationStore::new(&config.session)));

        let runtime = AgentRuntime::new(Arc::clone(&provider), &config.llm);
        let pipeline = AiPipeline::new(
            runtime,
            Orchestrator::new(config.orchestrator.intent_classifier),
            personalization.clone(),
            Duration::from_secs(config.http.request_timeout_secs),
        );

        Self {
            config: Arc::new(config),
            provider,
            pipeline: Arc::new(pipeline),
            personalization,
        }
    }

    /// Assemble resources with the provider selected by configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be created
    pub fn from_config(config: ServerConfig) -> AppResult<Self> {
        let provider = create_provider(&config.llm)?;
        Ok(Self::new(config, provider))
    }
}
