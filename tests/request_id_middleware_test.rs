// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! Integration tests for request ID middleware
//!
//! Tests the request ID middleware functionality including:
//! - UUID generation when the caller sends none
//! - Reuse of a well-formed caller id
//! - Request ID availability in handlers via extensions

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::{to_bytes, Body},
    http::{Request as HttpRequest, StatusCode},
    middleware,
    routing::get,
    Extension, Router,
};
use omteam_ai_server::middleware::request_id::{request_id_middleware, RequestId};
use std::error::Error;
use tower::ServiceExt;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

async fn test_handler(Extension(request_id): Extension<RequestId>) -> String {
    format!("Request ID: {}", request_id.as_str())
}

fn app() -> Router {
    Router::new()
        .route("/", get(test_handler))
        .layer(middleware::from_fn(request_id_middleware))
}

#[tokio::test]
async fn test_request_id_middleware_generates_id() -> Result<(), Box<dyn Error>> {
    let request = HttpRequest::builder().uri("/").body(Body::empty())?;

    let response = app().oneshot(request).await?;

    let header_value = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .ok_or("Request ID header not present")?;
    assert!(
        Uuid::parse_str(header_value.to_str()?).is_ok(),
        "Request ID is not a valid UUID"
    );

    Ok(())
}

#[tokio::test]
async fn test_caller_request_id_is_echoed() -> Result<(), Box<dyn Error>> {
    let request = HttpRequest::builder()
        .uri("/")
        .header(REQUEST_ID_HEADER, "app-7f3a:retry.2")
        .body(Body::empty())?;

    let response = app().oneshot(request).await?;

    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "app-7f3a:retry.2"
    );
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(String::from_utf8(body.to_vec())?, "Request ID: app-7f3a:retry.2");

    Ok(())
}

#[tokio::test]
async fn test_invalid_caller_request_id_is_replaced() -> Result<(), Box<dyn Error>> {
    let request = HttpRequest::builder()
        .uri("/")
        .header(REQUEST_ID_HEADER, "bad id with spaces")
        .body(Body::empty())?;

    let response = app().oneshot(request).await?;

    let echoed = response.headers().get(REQUEST_ID_HEADER).unwrap().to_str()?;
    assert_ne!(echoed, "bad id with spaces");
    assert!(Uuid::parse_str(echoed).is_ok());

    Ok(())
}

#[tokio::test]
async fn test_request_id_available_in_handler() -> Result<(), Box<dyn Error>> {
    let request = HttpRequest::builder().uri("/").body(Body::empty())?;

    let response = app().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    let body_str = String::from_utf8(body.to_vec())?;
    assert!(body_str.starts_with("Request ID: "));

    Ok(())
}
