// ABOUTME: Integration tests for the deprecated per-feature AI endpoints
// ABOUTME: Verifies forced intents, deprecation headers and the disable switch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use helpers::axum_test::AxumTestRequest;
use helpers::scripted_llm::ScriptedLlmProvider;
use omteam_ai_server::server::build_router;
use serde_json::Value;

#[tokio::test]
async fn test_legacy_missions_forces_daily_mission() {
    let provider = ScriptedLlmProvider::replying(common::mission_plan_json());
    let app = common::test_router(Arc::clone(&provider));

    // Free text alone would route to chat
    let response = AxumTestRequest::post("/ai/missions/daily")
        .json(&common::text_request("안녕하세요"))
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.header("deprecation").as_deref(), Some("true"));
    assert_eq!(
        response.header("link").as_deref(),
        Some("</ai/chat/messages>; rel=\"successor-version\"")
    );

    let body: Value = response.json();
    assert_eq!(body["dailyMission"]["missions"].as_array().unwrap().len(), 3);
    assert!(body["chat"].is_null());
}

#[tokio::test]
async fn test_legacy_chat_sessions_overrides_request_intent() {
    let provider = ScriptedLlmProvider::replying(common::chat_reply_json("무엇을 도와드릴까요?"));
    let app = common::test_router(Arc::clone(&provider));

    let mut request = common::onboarding_request();
    request["intent"] = serde_json::json!("DAILY_MISSION");

    let response = AxumTestRequest::post("/ai/chat/sessions")
        .json(&request)
        .send(app)
        .await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["chat"]["botMessage"]["text"], "무엇을 도와드릴까요?");
    assert!(body["dailyMission"].is_null());
}

#[tokio::test]
async fn test_legacy_errors_keep_deprecation_headers() {
    let provider = Arc::new(ScriptedLlmProvider::new());
    let app = common::test_router(provider);

    let response = AxumTestRequest::post("/ai/analysis/weekly")
        .json(&common::text_request(""))
        .send(app)
        .await;

    assert_eq!(response.status(), 400);
    assert_eq!(response.header("deprecation").as_deref(), Some("true"));
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");
}

#[tokio::test]
async fn test_disabled_legacy_endpoints_are_not_mounted() {
    let provider = Arc::new(ScriptedLlmProvider::new());
    let mut config = common::test_config();
    config.http.legacy_endpoints_enabled = false;
    let app = build_router(common::test_resources(config, provider));

    let response = AxumTestRequest::post("/ai/analysis/daily")
        .json(&common::text_request("오늘 피드백"))
        .send(app)
        .await;

    assert_eq!(response.status(), 404);
    assert!(response.header("deprecation").is_none());
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}
