// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, test configuration and router construction around a scripted LLM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::wildcard_in_or_patterns
)]
//! Shared test utilities for `omteam_ai_server`

use axum::Router;
use omteam_ai_server::config::{Environment, ServerConfig};
use omteam_ai_server::resources::ServerResources;
use omteam_ai_server::server::build_router;
use serde_json::{json, Value};
use std::sync::{Arc, Once};

use crate::helpers::scripted_llm::ScriptedLlmProvider;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Configuration suitable for in-process router tests
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.app.environment = Environment::Testing;
    config.app.git_sha = "test-sha".to_owned();
    config.http.request_timeout_secs = 5;
    config
}

/// Resources wired to the given scripted provider
pub fn test_resources(config: ServerConfig, provider: Arc<ScriptedLlmProvider>) -> Arc<ServerResources> {
    init_test_logging();
    Arc::new(ServerResources::new(config, provider))
}

/// Full router with all middleware, backed by a scripted provider
pub fn test_router(provider: Arc<ScriptedLlmProvider>) -> Router {
    build_router(test_resources(test_config(), provider))
}

/// Request body for a free-text turn
pub fn text_request(text: &str) -> Value {
    json!({
        "userId": 1,
        "sessionId": "session-1",
        "input": {"type": "TEXT", "text": text},
        "timestamp": "2025-01-15T09:00:00Z"
    })
}

/// Request body carrying onboarding answers, which routes to mission recommendation
pub fn onboarding_request() -> Value {
    json!({
        "userId": "user-42",
        "input": {"type": "TEXT", "text": "오늘 뭐 하면 좋을까?"},
        "context": {
            "userContext": {
                "nickname": "민지",
                "recentMissionSuccessRate": 60.0
            },
            "onboarding": {
                "appGoal": "체중 감량",
                "preferredExercises": ["걷기", "스트레칭"]
            }
        },
        "timestamp": "2025-01-15T09:00:00"
    })
}

/// Model answer accepted by the planner
pub fn mission_plan_json() -> String {
    json!({
        "missions": [
            {"name": "점심 후 15분 걷기", "type": "EXERCISE", "difficulty": 2, "estimatedMinutes": 15, "estimatedCalories": 60},
            {"name": "저녁 탄산음료 대신 물 마시기", "type": "DIET", "difficulty": 1, "estimatedMinutes": 1, "estimatedCalories": 0},
            {"name": "스쿼트 20회", "type": "EXERCISE", "difficulty": 3, "estimatedMinutes": 5, "estimatedCalories": 30}
        ]
    })
    .to_string()
}

/// Model answer accepted by the coach
pub fn chat_reply_json(text: &str) -> String {
    json!({
        "botMessage": {
            "text": text,
            "options": [{"label": "좋아요", "value": "yes"}]
        },
        "state": {"isTerminal": false}
    })
    .to_string()
}
