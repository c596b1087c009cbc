// ABOUTME: Axum IntoResponse implementation for AppError
// ABOUTME: Renders every error as a UnifiedAiResponse with only the error field set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

use super::AppError;
use crate::models::UnifiedAiResponse;

impl AppError {
    /// HTTP status for this error as an `http::StatusCode`
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(UnifiedAiResponse::failure(&self))).into_response()
    }
}
