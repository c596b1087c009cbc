// ABOUTME: Whole-request deadline middleware rendering expiries as TIMEOUT envelopes
// ABOUTME: Backstop for requests that stall outside the pipeline's own deadline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::time::Duration;
use tracing::warn;

use super::RequestId;
use crate::errors::AppError;

/// Abort the request once `limit` has elapsed
///
/// Install with `middleware::from_fn_with_state(limit, request_deadline_middleware)`
/// inside the request id layer so the envelope carries the correlation id.
pub async fn request_deadline_middleware(
    State(limit): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = request.extensions().get::<RequestId>().cloned();

    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(
                limit_secs = limit.as_secs_f64(),
                "Request exceeded the server deadline"
            );
            let error = AppError::timeout(format!(
                "Request did not complete within {} seconds",
                limit.as_secs()
            ));
            match request_id {
                Some(id) => error.with_request_id(id.as_str()),
                None => error,
            }
            .into_response()
        }
    }
}
