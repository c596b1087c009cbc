// ABOUTME: Specialized AI agents that turn request context into structured results
// ABOUTME: Shared runtime for prompt assembly, LLM invocation and JSON parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! # Agents
//!
//! Every agent is a stateless transformer `(context, history) -> result`:
//!
//! - **planner**: daily mission recommendations
//! - **analyst**: daily feedback and weekly analysis
//! - **coach**: the next chatbot turn
//!
//! The [`orchestrator`] picks one of them per request and the [`pipeline`]
//! runs the whole flow. Agents talk to the model only through
//! [`AgentRuntime`], which holds the shared [`SharedLlmProvider`].

pub mod analyst;
pub mod assembler;
pub mod coach;
pub mod orchestrator;
pub mod parser;
pub mod pipeline;
pub mod planner;

pub use orchestrator::{IntentResolution, Orchestrator, ResolutionRule};
pub use pipeline::AiPipeline;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use tracing::{debug, instrument};

use crate::config::LlmConfig;
use crate::errors::AppResult;
use crate::llm::prompts::{
    compose_system_prompt, ANALYST_ROLE_PROMPT, COACH_ROLE_PROMPT, PLANNER_ROLE_PROMPT,
};
use crate::llm::{ChatMessage, ChatRequest, SharedLlmProvider};
use omteam_core::models::{AiChatRequest, AiRequestContext};

/// Which specialized agent handles a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentRole {
    /// Mission planner
    Planner,
    /// Daily and weekly analyst
    Analyst,
    /// Conversational coach
    Coach,
}

impl AgentRole {
    /// Label used in logs and the classifier prompt
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Planner => "planner",
            Self::Analyst => "analysis",
            Self::Coach => "coach",
        }
    }

    /// Role-specific system prompt
    #[must_use]
    pub const fn role_prompt(&self) -> &'static str {
        match self {
            Self::Planner => PLANNER_ROLE_PROMPT,
            Self::Analyst => ANALYST_ROLE_PROMPT,
            Self::Coach => COACH_ROLE_PROMPT,
        }
    }
}

impl Display for AgentRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything an agent needs from the current request
#[derive(Debug, Clone, Copy)]
pub struct AgentInput<'a> {
    /// The validated request
    pub request: &'a AiChatRequest,
    /// The request's context bag, possibly empty
    pub context: &'a AiRequestContext,
    /// Personalization summary for this user
    pub personalization: Option<&'a str>,
}

impl<'a> AgentInput<'a> {
    /// Borrow the parts of a request
    #[must_use]
    pub const fn new(
        request: &'a AiChatRequest,
        context: &'a AiRequestContext,
        personalization: Option<&'a str>,
    ) -> Self {
        Self {
            request,
            context,
            personalization,
        }
    }

    /// User identifier rendered for prompts
    #[must_use]
    pub fn user_label(&self) -> String {
        self.request
            .user_id
            .as_ref()
            .map_or_else(|| "알 수 없음".to_owned(), ToString::to_string)
    }

    /// Safety prompt, role prompt and personalization as leading messages
    #[must_use]
    pub fn system_messages(&self, role: AgentRole) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(compose_system_prompt(
            role.role_prompt(),
        ))];
        if let Some(summary) = self.personalization.filter(|s| !s.is_empty()) {
            messages.push(ChatMessage::system(summary));
        }
        messages
    }
}

/// Model access shared by all agents
#[derive(Clone)]
pub struct AgentRuntime {
    provider: SharedLlmProvider,
    temperature: f32,
    max_tokens: u32,
}

impl AgentRuntime {
    /// Wrap the shared provider with the configured sampling settings
    #[must_use]
    pub fn new(provider: SharedLlmProvider, config: &LlmConfig) -> Self {
        Self {
            provider,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// The shared provider
    #[must_use]
    pub fn provider(&self) -> &SharedLlmProvider {
        &self.provider
    }

    /// Send a prompt and return the raw completion text
    ///
    /// # Errors
    ///
    /// Propagates provider failures
    pub async fn invoke_text(&self, messages: Vec<ChatMessage>, json_mode: bool) -> AppResult<String> {
        let mut request = ChatRequest::new(messages)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);
        if json_mode {
            request = request.with_json_mode();
        }
        let response = self.provider.complete(&request).await?;
        if let Some(usage) = response.usage {
            debug!(
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "LLM call completed"
            );
        }
        Ok(response.content)
    }

    /// Send a prompt and parse the answer as `T`
    ///
    /// # Errors
    ///
    /// Propagates provider failures, and returns `ExternalResponseInvalid`
    /// when the answer holds no JSON matching `T`
    #[instrument(skip(self, messages), fields(agent = %role, messages = messages.len()))]
    pub async fn invoke_structured<T: DeserializeOwned>(
        &self,
        role: AgentRole,
        messages: Vec<ChatMessage>,
    ) -> AppResult<T> {
        let content = self.invoke_text(messages, true).await?;
        parser::parse_structured(&content, role.label())
    }
}

/// Render a labelled JSON line for a prompt data block
pub(crate) fn data_line(label: &str, value: &impl Serialize) -> String {
    let rendered = serde_json::to_string(value).unwrap_or_else(|_| "null".to_owned());
    format!("{label}: {rendered}")
}

/// Join a data block and an output contract into the final user turn
pub(crate) fn user_turn(data_lines: &[String], contract: &str) -> ChatMessage {
    ChatMessage::user(format!("{}\n\n{contract}", data_lines.join("\n")))
}
