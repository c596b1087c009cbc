// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Re-exports the environment loader and the typed configuration enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam
//! Configuration module for the Omteam AI server
//!
//! Configuration is environment-only:
//!
//! - **Environment**: `ServerConfig::from_env()` loads `.env` and parses every setting
//! - **Types**: Provider, environment and classifier enums shared with other modules

/// Environment and server configuration
pub mod environment;
/// Configuration enums
pub mod types;

pub use environment::{
    AppConfig, HttpConfig, LlmConfig, OrchestratorConfig, ServerConfig, SessionConfig,
};
pub use types::{Environment, IntentClassifierMode, LlmProviderType};
