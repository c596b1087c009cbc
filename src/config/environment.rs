// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, .env loading and typed parsing of every server setting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! Environment-based configuration management for production deployment

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

use super::types::{Environment, IntentClassifierMode, LlmProviderType};
use crate::constants::{defaults, env_vars};

/// Complete server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listener and request handling
    pub http: HttpConfig,
    /// Model provider
    pub llm: LlmConfig,
    /// Intent routing
    pub orchestrator: OrchestratorConfig,
    /// Personalization store
    pub session: SessionConfig,
    /// Deployment metadata
    pub app: AppConfig,
}

/// HTTP listener and request handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Request body cap in bytes
    pub max_body_bytes: usize,
    /// Comma-separated CORS origins, empty or `*` for any
    pub cors_allowed_origins: String,
    /// Mount the deprecated per-feature endpoints
    pub legacy_endpoints_enabled: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_owned(),
            port: defaults::PORT,
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
            max_body_bytes: defaults::MAX_BODY_BYTES,
            cors_allowed_origins: "*".to_owned(),
            legacy_endpoints_enabled: true,
        }
    }
}

/// Model provider settings
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Which provider family to use
    pub provider: LlmProviderType,
    /// Model identifier
    pub model: String,
    /// `OpenAI`-compatible base URL
    pub base_url: String,
    /// Bearer token, optional for local servers
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion token cap
    pub max_tokens: u32,
    /// HTTP call timeout in seconds
    pub request_timeout_secs: u64,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderType::Upstage,
            model: defaults::UPSTAGE_MODEL.to_owned(),
            base_url: defaults::UPSTAGE_BASE_URL.to_owned(),
            api_key: None,
            temperature: defaults::LLM_TEMPERATURE,
            max_tokens: defaults::LLM_MAX_TOKENS,
            request_timeout_secs: defaults::LLM_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Intent routing settings
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Fallback classifier for requests no rule matched
    pub intent_classifier: IntentClassifierMode,
}

/// Personalization store settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Record and inject per-user summaries
    pub enabled: bool,
    /// Seconds a record survives without updates
    pub ttl_secs: u64,
    /// Events kept per user
    pub max_events: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: defaults::SESSION_TTL_SECS,
            max_events: defaults::SESSION_MAX_EVENTS,
        }
    }
}

/// Deployment metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Build commit
    pub git_sha: String,
    /// Crate version
    pub service_version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            git_sha: defaults::GIT_SHA.to_owned(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, reading `.env` first
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed, or if
    /// the selected provider is missing required settings
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a present value cannot be parsed
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let environment = get(env_vars::APP_ENV)
            .or_else(|| get(env_vars::ENVIRONMENT))
            .map(|value| Environment::from_str_or_default(&value))
            .unwrap_or_default();

        let http = HttpConfig {
            host: get(env_vars::HOST).unwrap_or_else(|| defaults::HOST.to_owned()),
            port: parse_or(&get, env_vars::PORT, defaults::PORT)?,
            request_timeout_secs: parse_or(
                &get,
                env_vars::REQUEST_TIMEOUT_SECS,
                defaults::REQUEST_TIMEOUT_SECS,
            )?,
            max_body_bytes: parse_or(&get, env_vars::MAX_BODY_BYTES, defaults::MAX_BODY_BYTES)?,
            cors_allowed_origins: get(env_vars::CORS_ALLOWED_ORIGINS)
                .unwrap_or_else(|| "*".to_owned()),
            legacy_endpoints_enabled: parse_bool_or(
                &get,
                env_vars::LEGACY_ENDPOINTS_ENABLED,
                true,
            )?,
        };

        let llm = Self::llm_from_lookup(&get)?;

        let orchestrator = OrchestratorConfig {
            intent_classifier: get(env_vars::INTENT_CLASSIFIER)
                .map(|value| IntentClassifierMode::from_str_or_default(&value))
                .unwrap_or_default(),
        };

        let session = SessionConfig {
            enabled: parse_bool_or(&get, env_vars::SESSION_ENABLED, true)?,
            ttl_secs: parse_or(&get, env_vars::SESSION_TTL_SECS, defaults::SESSION_TTL_SECS)?,
            max_events: parse_or(
                &get,
                env_vars::SESSION_MAX_EVENTS,
                defaults::SESSION_MAX_EVENTS,
            )?,
        };

        let app = AppConfig {
            environment,
            git_sha: get(env_vars::GIT_SHA).unwrap_or_else(|| defaults::GIT_SHA.to_owned()),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
        };

        Ok(Self {
            http,
            llm,
            orchestrator,
            session,
            app,
        })
    }

    fn llm_from_lookup<G>(get: &G) -> Result<LlmConfig>
    where
        G: Fn(&str) -> Option<String>,
    {
        let provider = get(LlmProviderType::ENV_VAR)
            .map(|value| LlmProviderType::from_str_or_default(&value))
            .unwrap_or_default();

        let (default_base_url, default_model, api_key) = match provider {
            LlmProviderType::Upstage => (
                defaults::UPSTAGE_BASE_URL,
                defaults::UPSTAGE_MODEL,
                get(env_vars::UPSTAGE_API_KEY),
            ),
            LlmProviderType::Local => (
                defaults::LOCAL_BASE_URL,
                defaults::LOCAL_MODEL,
                get(env_vars::LOCAL_LLM_API_KEY),
            ),
        };

        let provider_base_url = match provider {
            LlmProviderType::Upstage => None,
            LlmProviderType::Local => get(env_vars::LOCAL_LLM_BASE_URL),
        };
        let provider_model = match provider {
            LlmProviderType::Upstage => None,
            LlmProviderType::Local => get(env_vars::LOCAL_LLM_MODEL),
        };

        let temperature: f32 =
            parse_or(get, env_vars::LLM_TEMPERATURE, defaults::LLM_TEMPERATURE)?;
        if !(0.0..=2.0).contains(&temperature) {
            bail!("Invalid LLM_TEMPERATURE value: {temperature} (expected 0.0 to 2.0)");
        }

        Ok(LlmConfig {
            provider,
            model: get(env_vars::LLM_MODEL)
                .or(provider_model)
                .unwrap_or_else(|| default_model.to_owned()),
            base_url: get(env_vars::LLM_BASE_URL)
                .or(provider_base_url)
                .unwrap_or_else(|| default_base_url.to_owned()),
            api_key,
            temperature,
            max_tokens: parse_or(get, env_vars::LLM_MAX_TOKENS, defaults::LLM_MAX_TOKENS)?,
            request_timeout_secs: parse_or(
                get,
                env_vars::LLM_REQUEST_TIMEOUT_SECS,
                defaults::LLM_REQUEST_TIMEOUT_SECS,
            )?,
        })
    }

    /// Validate configuration for startup
    ///
    /// # Errors
    ///
    /// Returns an error if required settings are missing or inconsistent
    pub fn validate(&self) -> Result<()> {
        if self.llm.provider == LlmProviderType::Upstage && self.llm.api_key.is_none() {
            bail!(
                "{} is required when {} is '{}'",
                env_vars::UPSTAGE_API_KEY,
                LlmProviderType::ENV_VAR,
                LlmProviderType::Upstage
            );
        }

        if self.http.request_timeout_secs <= self.llm.request_timeout_secs {
            warn!(
                "REQUEST_TIMEOUT_SECS ({}) is not greater than LLM_REQUEST_TIMEOUT_SECS ({}); \
                 slow model calls will surface as request timeouts",
                self.http.request_timeout_secs, self.llm.request_timeout_secs
            );
        }

        if self.session.max_events == 0 {
            bail!("Invalid SESSION_MAX_EVENTS value: must be at least 1");
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Omteam AI Server Configuration:\n\
             - Environment: {}\n\
             - Listen: {}:{}\n\
             - Request Timeout: {}s\n\
             - LLM Provider: {} ({})\n\
             - LLM Base URL: {}\n\
             - LLM API Key: {}\n\
             - Intent Classifier: {}\n\
             - Legacy Endpoints: {}\n\
             - Personalization: {}\n\
             - Git SHA: {}",
            self.app.environment,
            self.http.host,
            self.http.port,
            self.http.request_timeout_secs,
            self.llm.provider,
            self.llm.model,
            self.llm.base_url,
            if self.llm.api_key.is_some() {
                "Configured"
            } else {
                "Not set"
            },
            self.orchestrator.intent_classifier,
            if self.http.legacy_endpoints_enabled {
                "Enabled"
            } else {
                "Disabled"
            },
            if self.session.enabled {
                "Enabled"
            } else {
                "Disabled"
            },
            self.app.git_sha
        )
    }
}

/// Parse a variable if present, otherwise use the default
fn parse_or<G, T>(get: &G, key: &str, default: T) -> Result<T>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    get(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .with_context(|| format!("Invalid {key} value"))
    })
}

/// Parse a boolean flag accepting `true/false`, `1/0`, `yes/no`
fn parse_bool_or<G>(get: &G, key: &str, default: bool) -> Result<bool>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|raw| raw.trim().to_lowercase()).as_deref() {
        None => Ok(default),
        Some("true" | "1" | "yes" | "on") => Ok(true),
        Some("false" | "0" | "no" | "off") => Ok(false),
        Some(other) => bail!("Invalid {key} value: '{other}'"),
    }
}
