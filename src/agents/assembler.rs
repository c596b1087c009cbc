// ABOUTME: Response assembler packaging agent output or errors into the unified envelope
// ABOUTME: Pairs each UnifiedAiResponse with its HTTP status and request correlation id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use crate::errors::{AppError, AppResult};
use omteam_core::models::{AiPayload, UnifiedAiResponse};

/// Envelope ready to be written to the wire
#[derive(Debug, Clone)]
pub struct AssembledResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response body
    pub body: UnifiedAiResponse,
}

impl AssembledResponse {
    /// Wrap a successful agent payload
    #[must_use]
    pub fn success(payload: AiPayload) -> Self {
        Self {
            status: StatusCode::OK,
            body: UnifiedAiResponse::from_payload(payload),
        }
    }

    /// Wrap an error, tagging it with the request id when missing
    #[must_use]
    pub fn failure(error: AppError, request_id: Option<&str>) -> Self {
        let error = match (error.request_id.is_none(), request_id) {
            (true, Some(id)) => error.with_request_id(id),
            _ => error,
        };

        if error.code.is_client_error() {
            warn!(code = %error.code, "Request rejected: {}", error.message);
        } else {
            error!(code = %error.code, "Request failed: {}", error.message);
        }

        Self {
            status: error.status_code(),
            body: UnifiedAiResponse::failure(&error),
        }
    }
}

/// Map a pipeline outcome to the envelope
#[must_use]
pub fn assemble(outcome: AppResult<AiPayload>, request_id: Option<&str>) -> AssembledResponse {
    match outcome {
        Ok(payload) => AssembledResponse::success(payload),
        Err(error) => AssembledResponse::failure(error, request_id),
    }
}

impl IntoResponse for AssembledResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use omteam_core::models::{DailyMissionResult, Mission, MissionType};

    #[test]
    fn test_success_populates_one_field() {
        let assembled = assemble(
            Ok(AiPayload::DailyMission(DailyMissionResult {
                missions: vec![Mission {
                    name: "스쿼트 20회".to_owned(),
                    mission_type: MissionType::Exercise,
                    difficulty: 2,
                    estimated_minutes: 5,
                    estimated_calories: 30,
                }],
            })),
            Some("req-1"),
        );

        assert_eq!(assembled.status, StatusCode::OK);
        assert!(assembled.body.is_well_formed());
        assert_eq!(assembled.body.populated_payloads(), 1);
    }

    #[test]
    fn test_failure_carries_request_id_and_status() {
        let assembled = assemble(
            Err(AppError::external_service("Upstage", "boom")),
            Some("req-2"),
        );

        assert_eq!(assembled.status, StatusCode::BAD_GATEWAY);
        let detail = assembled.body.error_detail().unwrap();
        assert_eq!(detail.code, ErrorCode::ExternalServiceError);
        assert_eq!(detail.request_id.as_deref(), Some("req-2"));
        assert_eq!(assembled.body.populated_payloads(), 0);
    }
}
