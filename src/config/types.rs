// ABOUTME: Core configuration type definitions for environment, LLM provider and orchestration
// ABOUTME: Contains Environment, LlmProviderType and IntentClassifierMode enums used across config modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Environment type for logging and error detail decisions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment (default)
    #[default]
    Development,
    /// Staging environment mirroring production
    Staging,
    /// Production environment
    Production,
    /// Testing environment for automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "staging" | "stg" => Self::Staging,
            "testing" | "test" => Self::Testing,
            _ => Self::Development, // Default fallback (including "development" | "dev")
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Development => write!(f, "development"),
            Self::Staging => write!(f, "staging"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// LLM provider selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// Upstage Solar via its `OpenAI`-compatible API (default)
    #[default]
    Upstage,
    /// Local LLM provider - `OpenAI`-compatible endpoint (Ollama, vLLM)
    Local,
}

impl LlmProviderType {
    /// Environment variable name for LLM provider selection
    pub const ENV_VAR: &'static str = "OMTEAM_LLM_PROVIDER";

    /// Parse from string with fallback to default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "local" | "ollama" | "vllm" => Self::Local,
            _ => Self::Upstage, // Default fallback (including "upstage" | "solar")
        }
    }
}

impl Display for LlmProviderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Upstage => write!(f, "upstage"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// How free-text requests without context signals are classified
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntentClassifierMode {
    /// Rule table only (default)
    #[default]
    Rules,
    /// Ask the model when no rule matched
    Llm,
}

impl IntentClassifierMode {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "llm" | "model" => Self::Llm,
            _ => Self::Rules,
        }
    }
}

impl Display for IntentClassifierMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Rules => write!(f, "rules"),
            Self::Llm => write!(f, "llm"),
        }
    }
}
