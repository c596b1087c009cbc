// ABOUTME: LLM provider selector for runtime provider switching
// ABOUTME: Builds the shared provider (Upstage or local OpenAI-compatible) from configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! # LLM Provider Selector
//!
//! Set `OMTEAM_LLM_PROVIDER`:
//! - `upstage` (default): Upstage Solar through its `OpenAI`-compatible API
//! - `local`: Ollama, vLLM or any `OpenAI`-compatible server

use std::sync::Arc;
use tracing::info;

use super::{OpenAiCompatibleConfig, OpenAiCompatibleProvider, SharedLlmProvider};
use crate::config::{LlmConfig, LlmProviderType};
use crate::errors::{AppError, AppResult};

/// Create the provider selected by configuration
///
/// # Errors
///
/// Returns an error if Upstage is selected without an API key or the HTTP
/// client cannot be built.
pub fn create_provider(config: &LlmConfig) -> AppResult<SharedLlmProvider> {
    if config.provider == LlmProviderType::Upstage
        && config.api_key.as_deref().is_none_or(str::is_empty)
    {
        return Err(AppError::config("UPSTAGE_API_KEY is not configured"));
    }

    let provider = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::from_llm_config(config))?;
    info!(
        "LLM provider ready: {} ({})",
        provider.config().display_name,
        provider.config().default_model
    );

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_upstage_requires_key() {
        let config = LlmConfig::default();
        let err = create_provider(&config).err().unwrap();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }

    #[test]
    fn test_local_provider_without_key() {
        let config = LlmConfig {
            provider: LlmProviderType::Local,
            model: "qwen2.5:14b-instruct".to_owned(),
            base_url: "http://localhost:11434/v1".to_owned(),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.default_model(), "qwen2.5:14b-instruct");
    }
}
