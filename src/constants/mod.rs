// ABOUTME: System-wide constants for the Omteam AI server
// ABOUTME: Environment variable names, defaults, route paths and service names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! # Constants Module
//!
//! Environment variable names and their defaults live side by side so the
//! configuration loader and the documentation cannot drift apart.

/// Environment variable names
pub mod env_vars {
    /// Bind address
    pub const HOST: &str = "HOST";
    /// Bind port
    pub const PORT: &str = "PORT";
    /// Deployment environment (`APP_ENV` wins over `ENVIRONMENT`)
    pub const APP_ENV: &str = "APP_ENV";
    /// Deployment environment fallback shared with the logging setup
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Build commit reported by the health endpoints
    pub const GIT_SHA: &str = "GIT_SHA";
    /// Comma-separated CORS origins, `*` for any
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// Whole-request timeout
    pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
    /// Request body cap in bytes
    pub const MAX_BODY_BYTES: &str = "MAX_BODY_BYTES";
    /// Mount the deprecated per-feature endpoints
    pub const LEGACY_ENDPOINTS_ENABLED: &str = "LEGACY_ENDPOINTS_ENABLED";

    /// Upstage API key
    pub const UPSTAGE_API_KEY: &str = "UPSTAGE_API_KEY";
    /// Model override for any provider
    pub const LLM_MODEL: &str = "OMTEAM_LLM_MODEL";
    /// Base URL override for any provider
    pub const LLM_BASE_URL: &str = "OMTEAM_LLM_BASE_URL";
    /// Local OpenAI-compatible server base URL
    pub const LOCAL_LLM_BASE_URL: &str = "LOCAL_LLM_BASE_URL";
    /// Local model name
    pub const LOCAL_LLM_MODEL: &str = "LOCAL_LLM_MODEL";
    /// Local API key (optional)
    pub const LOCAL_LLM_API_KEY: &str = "LOCAL_LLM_API_KEY";
    /// Sampling temperature
    pub const LLM_TEMPERATURE: &str = "LLM_TEMPERATURE";
    /// Completion token cap
    pub const LLM_MAX_TOKENS: &str = "LLM_MAX_TOKENS";
    /// Model HTTP call timeout
    pub const LLM_REQUEST_TIMEOUT_SECS: &str = "LLM_REQUEST_TIMEOUT_SECS";

    /// `rules` or `llm`
    pub const INTENT_CLASSIFIER: &str = "INTENT_CLASSIFIER";

    /// Enable the personalization store
    pub const SESSION_ENABLED: &str = "SESSION_ENABLED";
    /// Personalization record lifetime
    pub const SESSION_TTL_SECS: &str = "SESSION_TTL_SECS";
    /// Events kept per user
    pub const SESSION_MAX_EVENTS: &str = "SESSION_MAX_EVENTS";
}

/// Default configuration values
pub mod defaults {
    /// Bind address
    pub const HOST: &str = "0.0.0.0";
    /// Bind port
    pub const PORT: u16 = 8000;
    /// Whole-request timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 90;
    /// 256 KiB request body cap
    pub const MAX_BODY_BYTES: usize = 256 * 1024;
    /// Commit reported when `GIT_SHA` is unset
    pub const GIT_SHA: &str = "unknown";

    /// Upstage OpenAI-compatible endpoint
    pub const UPSTAGE_BASE_URL: &str = "https://api.upstage.ai/v1";
    /// Upstage Solar model
    pub const UPSTAGE_MODEL: &str = "solar-pro2";
    /// Ollama endpoint
    pub const LOCAL_BASE_URL: &str = "http://localhost:11434/v1";
    /// Local model
    pub const LOCAL_MODEL: &str = "qwen2.5:14b-instruct";
    /// Sampling temperature
    pub const LLM_TEMPERATURE: f32 = 0.7;
    /// Completion token cap
    pub const LLM_MAX_TOKENS: u32 = 2048;
    /// Model HTTP call timeout
    pub const LLM_REQUEST_TIMEOUT_SECS: u64 = 60;
    /// Model HTTP connect timeout
    pub const LLM_CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Personalization record lifetime (14 days)
    pub const SESSION_TTL_SECS: u64 = 60 * 60 * 24 * 14;
    /// Events kept per user
    pub const SESSION_MAX_EVENTS: usize = 30;
    /// Interval between expired-record sweeps
    pub const SESSION_SWEEP_INTERVAL_SECS: u64 = 60 * 10;
}

/// HTTP route paths
pub mod routes {
    /// Unified AI endpoint
    pub const AI_CHAT_MESSAGES: &str = "/ai/chat/messages";
    /// Deprecated mission endpoint
    pub const LEGACY_DAILY_MISSIONS: &str = "/ai/missions/daily";
    /// Deprecated daily analysis endpoint
    pub const LEGACY_DAILY_ANALYSIS: &str = "/ai/analysis/daily";
    /// Deprecated weekly analysis endpoint
    pub const LEGACY_WEEKLY_ANALYSIS: &str = "/ai/analysis/weekly";
    /// Deprecated chat session endpoint
    pub const LEGACY_CHAT_SESSIONS: &str = "/ai/chat/sessions";
    /// Liveness
    pub const HEALTH: &str = "/health";
    /// Readiness
    pub const READY: &str = "/ready";
}

/// Service names for structured logging and error messages
pub mod service_names {
    /// This server
    pub const OMTEAM_AI_SERVER: &str = "omteam-ai-server";
    /// Upstage Solar API
    pub const UPSTAGE: &str = "Upstage";
    /// Local OpenAI-compatible server
    pub const LOCAL_LLM: &str = "LocalLLM";
}

/// Request correlation header
pub const REQUEST_ID_HEADER: &str = "x-request-id";
