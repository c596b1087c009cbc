// ABOUTME: Generic OpenAI-compatible LLM provider for cloud and local endpoints
// ABOUTME: Supports Upstage Solar, Ollama, vLLM, and any OpenAI-compatible chat completions API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! # `OpenAI`-Compatible Provider
//!
//! Generic implementation for any `OpenAI`-compatible LLM endpoint. Upstage
//! exposes Solar through this API shape, and local servers like Ollama and
//! vLLM do as well, so one client covers every supported backend.
//!
//! ## Supported Backends
//!
//! - **Upstage Solar**: <https://api.upstage.ai/v1>
//! - **Ollama**: <http://localhost:11434/v1>
//! - **vLLM**: <http://localhost:8000/v1>
//! - **Any `OpenAI`-compatible endpoint**

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage};
use crate::config::{LlmConfig, LlmProviderType};
use crate::constants::{defaults, service_names};
use crate::errors::{AppError, ErrorCode};

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// OpenAI-compatible API request structure
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

/// Structured output selector
#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// Message structure for OpenAI-compatible API
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// OpenAI-compatible API response structure
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

/// Choice in response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

/// Message in response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

/// Usage statistics in response
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

/// Error response structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <https://api.upstage.ai/v1>)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Provider name for logging
    pub provider_name: String,
    /// Provider display name
    pub display_name: String,
    /// Service label used in error messages
    pub service_label: &'static str,
    /// Capabilities of this provider
    pub capabilities: LlmCapabilities,
    /// Whole-call timeout in seconds
    pub request_timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl std::fmt::Debug for OpenAiCompatibleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("default_model", &self.default_model)
            .field("provider_name", &self.provider_name)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl OpenAiCompatibleConfig {
    /// Create configuration for Upstage Solar
    #[must_use]
    pub fn upstage(api_key: impl Into<String>, model: &str) -> Self {
        Self {
            base_url: defaults::UPSTAGE_BASE_URL.to_owned(),
            api_key: Some(api_key.into()),
            default_model: model.to_owned(),
            provider_name: "upstage".to_owned(),
            display_name: "Upstage Solar".to_owned(),
            service_label: service_names::UPSTAGE,
            capabilities: LlmCapabilities::structured(),
            ..Self::default()
        }
    }

    /// Create configuration for a local Ollama instance
    #[must_use]
    pub fn ollama(model: &str) -> Self {
        Self {
            base_url: defaults::LOCAL_BASE_URL.to_owned(),
            default_model: model.to_owned(),
            provider_name: "ollama".to_owned(),
            display_name: "Ollama (Local)".to_owned(),
            capabilities: LlmCapabilities::text_only(),
            ..Self::default()
        }
    }

    /// Create configuration for a local vLLM instance
    #[must_use]
    pub fn vllm(model: &str) -> Self {
        Self {
            base_url: "http://localhost:8000/v1".to_owned(),
            default_model: model.to_owned(),
            provider_name: "vllm".to_owned(),
            display_name: "vLLM (Local)".to_owned(),
            capabilities: LlmCapabilities::structured(),
            ..Self::default()
        }
    }

    /// Build configuration from the server's LLM settings
    #[must_use]
    pub fn from_llm_config(config: &LlmConfig) -> Self {
        let preset = match config.provider {
            LlmProviderType::Upstage => {
                Self::upstage(config.api_key.clone().unwrap_or_default(), &config.model)
            }
            LlmProviderType::Local if config.base_url.contains(":8000") => {
                Self::vllm(&config.model)
            }
            LlmProviderType::Local if config.base_url.contains(":11434") => {
                Self::ollama(&config.model)
            }
            LlmProviderType::Local => Self {
                default_model: config.model.clone(),
                ..Self::default()
            },
        };

        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            request_timeout_secs: config.request_timeout_secs,
            ..preset
        }
    }
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::LOCAL_BASE_URL.to_owned(),
            api_key: None,
            default_model: defaults::LOCAL_MODEL.to_owned(),
            provider_name: "local".to_owned(),
            display_name: "Local LLM".to_owned(),
            service_label: service_names::LOCAL_LLM,
            capabilities: LlmCapabilities::text_only(),
            request_timeout_secs: defaults::LLM_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: defaults::LLM_CONNECT_TIMEOUT_SECS,
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible LLM provider
///
/// Works with any endpoint that implements the `OpenAI` chat completions API.
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Initializing {} provider: base_url={}, model={}",
            config.display_name, config.base_url, config.default_model
        );

        Ok(Self { client, config })
    }

    /// Provider configuration
    #[must_use]
    pub const fn config(&self) -> &OpenAiCompatibleConfig {
        &self.config
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Add authorization header if API key is configured
    fn add_auth_header(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }

    /// Log message details for debugging LLM interactions
    fn log_messages_debug(messages: &[OpenAiMessage], provider_name: &str) {
        for (i, msg) in messages.iter().enumerate() {
            debug!(
                "Message[{i}] role={}, content_len={}",
                msg.role,
                msg.content.len()
            );
        }
        debug!(
            "Sending chat completion request to {provider_name} with {} messages",
            messages.len()
        );
    }

    /// Map a transport failure to an application error
    fn transport_error(&self, e: &reqwest::Error, action: &str) -> AppError {
        error!(
            "Failed to {} {}: {}",
            action, self.config.provider_name, e
        );
        if e.is_timeout() {
            AppError::timeout(format!(
                "{} did not answer within {}s",
                self.config.display_name, self.config.request_timeout_secs
            ))
        } else if e.is_connect() {
            AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                format!(
                    "{}: Cannot connect to {} at {}",
                    self.config.service_label, self.config.display_name, self.config.base_url
                ),
            )
        } else {
            AppError::external_service(self.config.service_label, format!("Failed to {action}: {e}"))
        }
    }

    /// Parse error response from API
    fn parse_error_response(&self, status: StatusCode, body: &str) -> AppError {
        let service = self.config.service_label;

        if let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) {
            let detail = error_response.error.message;

            match status.as_u16() {
                401 | 403 => AppError::new(
                    ErrorCode::ExternalAuthFailed,
                    format!("{service}: API authentication failed: {detail}"),
                ),
                429 => AppError::new(
                    ErrorCode::ExternalRateLimited,
                    Self::extract_rate_limit_message(&detail),
                ),
                400 => AppError::external_service(service, format!("API validation error: {detail}")),
                404 => AppError::external_service(
                    service,
                    format!("Model or endpoint not found: {detail}"),
                ),
                502..=504 => AppError::new(
                    ErrorCode::ExternalServiceUnavailable,
                    format!("{service}: Service unavailable: {detail}"),
                ),
                _ => {
                    let error_type = error_response
                        .error
                        .error_type
                        .unwrap_or_else(|| "unknown".to_owned());
                    AppError::external_service(service, format!("{error_type} - {detail}"))
                }
            }
        } else {
            // Handle non-JSON error responses (common with local servers and gateways)
            match status.as_u16() {
                401 | 403 => AppError::new(
                    ErrorCode::ExternalAuthFailed,
                    format!("{service}: API authentication failed ({status})"),
                ),
                502..=504 => AppError::new(
                    ErrorCode::ExternalServiceUnavailable,
                    format!("{service}: LLM server is not responding ({status})"),
                ),
                _ => AppError::external_service(
                    service,
                    format!(
                        "API error ({}): {}",
                        status,
                        body.chars().take(200).collect::<String>()
                    ),
                ),
            }
        }
    }

    /// Extract a user-friendly rate limit message from an OpenAI-compatible error
    fn extract_rate_limit_message(message: &str) -> String {
        let lowered = message.to_lowercase();
        if let Some(retry_pos) = lowered.find("try again in ") {
            let after_prefix = &lowered[retry_pos + "try again in ".len()..];
            let end_pos = after_prefix
                .find(|c: char| !c.is_ascii_digit() && c != '.')
                .unwrap_or(after_prefix.len());
            if let Ok(seconds) = after_prefix[..end_pos].parse::<f64>() {
                let seconds_int = seconds.ceil() as u64;
                return format!("LLM rate limit reached. Please try again in {seconds_int} seconds.");
            }
        }
        "LLM rate limit reached. Please wait a moment and try again.".to_owned()
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.config.provider_name
    }

    fn display_name(&self) -> &str {
        &self.config.display_name
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(provider = %self.config.provider_name, model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let messages: Vec<OpenAiMessage> = request.messages.iter().map(OpenAiMessage::from).collect();
        Self::log_messages_debug(&messages, &self.config.provider_name);

        let response_format = (request.json_mode && self.config.capabilities.supports_json_mode())
            .then_some(ResponseFormat {
                format_type: "json_object",
            });

        let openai_request = OpenAiRequest {
            model: model.to_owned(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
            response_format,
        };

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(&openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.transport_error(&e, "send request to"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e, "read response from"))?;

        if !status.is_success() {
            return Err(self.parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse API response: {}", e);
            AppError::external_service(
                self.config.service_label,
                format!("Failed to parse response: {e}"),
            )
        })?;

        let choice = openai_response.choices.into_iter().next().ok_or_else(|| {
            AppError::external_service(self.config.service_label, "API returned no choices")
        })?;

        let content = choice.message.content.unwrap_or_default();

        debug!(
            "Received response from {}: {} chars, finish_reason: {:?}",
            self.config.provider_name,
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model: openai_response.model.unwrap_or_else(|| model.to_owned()),
            usage: openai_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        debug!(
            "Performing {} health check at {}",
            self.config.provider_name, self.config.base_url
        );

        // The models endpoint is a lightweight authenticated call
        let http_request = self.client.get(self.api_url("models"));

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| self.transport_error(&e, "reach"))?;

        let healthy = response.status().is_success();

        if healthy {
            debug!("{} health check passed", self.config.provider_name);
        } else {
            warn!(
                "{} health check failed with status: {}",
                self.config.provider_name,
                response.status()
            );
        }

        Ok(healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::upstage("key", "solar-pro2")).unwrap()
    }

    #[test]
    fn test_rate_limit_message_extracts_seconds() {
        let message = OpenAiCompatibleProvider::extract_rate_limit_message(
            "Rate limit reached. Please try again in 7.2s.",
        );
        assert_eq!(message, "LLM rate limit reached. Please try again in 8 seconds.");
    }

    #[test]
    fn test_rate_limit_message_fallback() {
        let message = OpenAiCompatibleProvider::extract_rate_limit_message("slow down");
        assert!(message.contains("wait a moment"));
    }

    #[test]
    fn test_error_mapping() {
        let provider = provider();
        let body = r#"{"error":{"message":"bad key","type":"invalid_request_error"}}"#;

        let auth = provider.parse_error_response(StatusCode::UNAUTHORIZED, body);
        assert_eq!(auth.code, ErrorCode::ExternalAuthFailed);

        let limited = provider.parse_error_response(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(limited.code, ErrorCode::ExternalRateLimited);

        let server = provider.parse_error_response(StatusCode::INTERNAL_SERVER_ERROR, body);
        assert_eq!(server.code, ErrorCode::ExternalServiceError);
        assert!(server.message.starts_with("Upstage"));

        let gateway = provider.parse_error_response(StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(gateway.code, ErrorCode::ExternalServiceUnavailable);
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let mut config = OpenAiCompatibleConfig::ollama("llama3.1");
        config.base_url = "http://localhost:11434/v1/".to_owned();
        let provider = OpenAiCompatibleProvider::new(config).unwrap();
        assert_eq!(
            provider.api_url("chat/completions"),
            "http://localhost:11434/v1/chat/completions"
        );
    }
}
