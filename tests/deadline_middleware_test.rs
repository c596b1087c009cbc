// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! Integration tests for the whole-request deadline middleware
//!
//! Tests the deadline backstop including:
//! - Enveloped TIMEOUT response when a handler stalls
//! - Request id carried into the error body
//! - Fast handlers passing through untouched

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::error::Error;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request as HttpRequest, StatusCode},
    middleware,
    routing::get,
    Router,
};
use omteam_ai_server::middleware::{request_deadline_middleware, request_id_middleware};
use serde_json::Value;
use tower::ServiceExt;

async fn slow_handler() -> &'static str {
    tokio::time::sleep(Duration::from_secs(2)).await;
    "too late"
}

async fn fast_handler() -> &'static str {
    "done"
}

fn app() -> Router {
    Router::new()
        .route("/slow", get(slow_handler))
        .route("/fast", get(fast_handler))
        .layer(middleware::from_fn_with_state(
            Duration::from_millis(100),
            request_deadline_middleware,
        ))
        .layer(middleware::from_fn(request_id_middleware))
}

#[tokio::test]
async fn test_stalled_request_returns_timeout_envelope() -> Result<(), Box<dyn Error>> {
    let request = HttpRequest::builder()
        .uri("/slow")
        .header("x-request-id", "req-stalled-1")
        .body(Body::empty())?;

    let response = app().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "req-stalled-1"
    );

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&body)?;
    assert_eq!(body["error"]["code"], "TIMEOUT");
    assert_eq!(body["error"]["requestId"], "req-stalled-1");
    assert!(body["chat"].is_null());
    assert!(body["dailyMission"].is_null());

    Ok(())
}

#[tokio::test]
async fn test_fast_request_passes_through() -> Result<(), Box<dyn Error>> {
    let request = HttpRequest::builder().uri("/fast").body(Body::empty())?;

    let response = app().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(String::from_utf8(body.to_vec())?, "done");

    Ok(())
}
