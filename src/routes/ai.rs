// ABOUTME: AI route handlers for the unified chat endpoint and deprecated per-feature endpoints
// ABOUTME: Decodes the request envelope, runs the AI pipeline and writes UnifiedAiResponse
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! AI routes
//!
//! `POST /ai/chat/messages` is the single entry point. The older
//! per-feature endpoints accept the same body, force their feature's intent
//! and mark responses with `Deprecation` and `Link` headers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Extension, Json, Router};
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::agents::assembler::{assemble, AssembledResponse};
use crate::constants::routes;
use crate::errors::{AppError, ErrorCode};
use crate::middleware::RequestId;
use crate::resources::ServerResources;
use omteam_core::models::{AiChatRequest, AiIntent};

const SUCCESSOR_LINK: &str = "</ai/chat/messages>; rel=\"successor-version\"";

/// AI routes implementation
pub struct AiRoutes;

impl AiRoutes {
    /// Create the AI routes, including deprecated ones when enabled
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let mut router = Router::new().route(routes::AI_CHAT_MESSAGES, post(Self::chat_messages));

        if resources.config.http.legacy_endpoints_enabled {
            router = router
                .route(routes::LEGACY_DAILY_MISSIONS, post(Self::legacy_daily_missions))
                .route(routes::LEGACY_DAILY_ANALYSIS, post(Self::legacy_daily_analysis))
                .route(routes::LEGACY_WEEKLY_ANALYSIS, post(Self::legacy_weekly_analysis))
                .route(routes::LEGACY_CHAT_SESSIONS, post(Self::legacy_chat_sessions));
        }

        router.with_state(resources)
    }

    /// Handle `POST /ai/chat/messages`
    #[instrument(skip_all, fields(route = routes::AI_CHAT_MESSAGES))]
    async fn chat_messages(
        State(resources): State<Arc<ServerResources>>,
        request_id: Option<Extension<RequestId>>,
        payload: Result<Json<AiChatRequest>, JsonRejection>,
    ) -> AssembledResponse {
        Self::process(&resources, request_id.as_ref(), payload, None).await
    }

    async fn legacy_daily_missions(
        State(resources): State<Arc<ServerResources>>,
        request_id: Option<Extension<RequestId>>,
        payload: Result<Json<AiChatRequest>, JsonRejection>,
    ) -> Response {
        Self::legacy(&resources, request_id, payload, AiIntent::DailyMission).await
    }

    async fn legacy_daily_analysis(
        State(resources): State<Arc<ServerResources>>,
        request_id: Option<Extension<RequestId>>,
        payload: Result<Json<AiChatRequest>, JsonRejection>,
    ) -> Response {
        Self::legacy(&resources, request_id, payload, AiIntent::DailyFeedback).await
    }

    async fn legacy_weekly_analysis(
        State(resources): State<Arc<ServerResources>>,
        request_id: Option<Extension<RequestId>>,
        payload: Result<Json<AiChatRequest>, JsonRejection>,
    ) -> Response {
        Self::legacy(&resources, request_id, payload, AiIntent::WeeklyAnalysis).await
    }

    async fn legacy_chat_sessions(
        State(resources): State<Arc<ServerResources>>,
        request_id: Option<Extension<RequestId>>,
        payload: Result<Json<AiChatRequest>, JsonRejection>,
    ) -> Response {
        Self::legacy(&resources, request_id, payload, AiIntent::Chat).await
    }

    #[instrument(skip_all, fields(intent = %intent))]
    async fn legacy(
        resources: &ServerResources,
        request_id: Option<Extension<RequestId>>,
        payload: Result<Json<AiChatRequest>, JsonRejection>,
        intent: AiIntent,
    ) -> Response {
        warn!(
            successor = routes::AI_CHAT_MESSAGES,
            "Deprecated AI endpoint called"
        );
        let assembled = Self::process(resources, request_id.as_ref(), payload, Some(intent)).await;
        (
            [
                (
                    HeaderName::from_static("deprecation"),
                    HeaderValue::from_static("true"),
                ),
                (header::LINK, HeaderValue::from_static(SUCCESSOR_LINK)),
            ],
            assembled,
        )
            .into_response()
    }

    async fn process(
        resources: &ServerResources,
        request_id: Option<&Extension<RequestId>>,
        payload: Result<Json<AiChatRequest>, JsonRejection>,
        forced_intent: Option<AiIntent>,
    ) -> AssembledResponse {
        let request_id = request_id.map(|Extension(id)| id.as_str());

        let outcome = match payload {
            Ok(Json(request)) => resources.pipeline.handle(request, forced_intent).await,
            Err(rejection) => Err(rejection_to_error(&rejection)),
        };

        assemble(outcome, request_id)
    }
}

/// Map an axum JSON rejection to the matching client error
fn rejection_to_error(rejection: &JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => AppError::new(
            ErrorCode::UnsupportedMediaType,
            "Expected request with `Content-Type: application/json`",
        ),
        JsonRejection::JsonSyntaxError(_) => {
            AppError::invalid_format(format!("Malformed JSON body: {}", rejection.body_text()))
        }
        JsonRejection::JsonDataError(_) => {
            AppError::invalid_format(format!("Invalid request body: {}", rejection.body_text()))
        }
        _ if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            AppError::new(ErrorCode::PayloadTooLarge, "Request body is too large")
        }
        _ => AppError::invalid_input(rejection.body_text()),
    }
}
