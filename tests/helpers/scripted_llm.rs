// ABOUTME: Scripted LLM provider for tests that replays queued answers and failures
// ABOUTME: Records every chat request so tests can assert on prompts and JSON mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

#![allow(dead_code)]

use async_trait::async_trait;
use omteam_ai_server::errors::{AppError, ErrorCode};
use omteam_ai_server::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

enum Step {
    Reply(String),
    Fail(ErrorCode, String),
}

/// Provider that answers from a queue
///
/// An empty queue answers with `INTERNAL_ERROR` so an unexpected extra
/// model call fails loudly.
pub struct ScriptedLlmProvider {
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<ChatRequest>>,
    delay: Option<Duration>,
}

impl ScriptedLlmProvider {
    /// Provider with nothing queued
    pub fn new() -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Provider answering once with `content`
    pub fn replying(content: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new().then_reply(content))
    }

    /// Provider failing once with `code`
    pub fn failing(code: ErrorCode, message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new().then_fail(code, message))
    }

    /// Queue an answer
    pub fn then_reply(self, content: impl Into<String>) -> Self {
        self.steps.lock().unwrap().push_back(Step::Reply(content.into()));
        self
    }

    /// Queue a failure
    pub fn then_fail(self, code: ErrorCode, message: impl Into<String>) -> Self {
        self.steps
            .lock()
            .unwrap()
            .push_back(Step::Fail(code, message.into()));
        self
    }

    /// Sleep before every answer
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of model calls made
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Concatenated system prompts of the request at `index`
    pub fn system_prompt(&self, index: usize) -> String {
        self.requests()[index]
            .messages
            .iter()
            .filter(|m| m.role == omteam_ai_server::llm::MessageRole::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlmProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn display_name(&self) -> &str {
        "Scripted Test Provider"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::structured()
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Reply(content)) => Ok(ChatResponse {
                content,
                model: "scripted-model".to_owned(),
                usage: None,
                finish_reason: Some("stop".to_owned()),
            }),
            Some(Step::Fail(code, message)) => Err(AppError::new(code, message)),
            None => Err(AppError::internal("scripted provider has no answer queued")),
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        Ok(true)
    }
}
