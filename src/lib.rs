// ABOUTME: Main library entry point for the Omteam AI server
// ABOUTME: Mission recommendation, daily/weekly feedback and coaching chat behind one HTTP endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

#![deny(unsafe_code)]

//! # Omteam AI Server
//!
//! HTTP backend that forwards fitness requests to an LLM and answers with a
//! single `UnifiedAiResponse` envelope.
//!
//! ## Features
//!
//! - **Unified endpoint**: `POST /ai/chat/messages` serves every AI feature
//! - **Intent routing**: explicit intent, context signals, keywords, then an optional LLM classifier
//! - **Agents**: planner (missions), analyst (daily/weekly feedback), coach (chat)
//! - **Providers**: Upstage Solar or any local OpenAI-compatible server
//! - **Personalization**: per-user in-memory preference and mission memory
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use omteam_ai_server::config::ServerConfig;
//! use omteam_ai_server::resources::ServerResources;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = Arc::new(ServerResources::from_config(config)?);
//!     omteam_ai_server::server::run(resources).await
//! }
//! ```

/// Orchestrator, agents, response assembler and request pipeline
pub mod agents;

/// Environment configuration
pub mod config;

/// Environment variable names, defaults and route paths
pub mod constants;

/// Error types shared with `omteam-core`
pub mod errors;

/// LLM provider abstraction and prompts
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Request id and CORS middleware
pub mod middleware;

/// Per-user personalization memory
pub mod personalization;

/// Shared server resources
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Router assembly and server lifecycle
pub mod server;

pub use omteam_core::models;
