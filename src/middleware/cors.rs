// ABOUTME: CORS middleware configuration for HTTP API endpoints
// ABOUTME: Provides Cross-Origin Resource Sharing setup for the mobile web client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use http::{header::HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::HttpConfig;
use crate::constants::REQUEST_ID_HEADER;

/// Configure CORS settings for the AI server
///
/// Origins come from `CORS_ALLOWED_ORIGINS`. An empty value or `*` allows
/// any origin; otherwise the comma-separated list is used.
///
/// # Examples
///
/// ```bash
/// # Allow all origins (development)
/// export CORS_ALLOWED_ORIGINS="*"
///
/// # Allow specific origins (production)
/// export CORS_ALLOWED_ORIGINS="https://app.omteam.kr,https://admin.omteam.kr"
/// ```
#[must_use]
pub fn setup_cors(config: &HttpConfig) -> CorsLayer {
    let configured = config.cors_allowed_origins.trim();
    let allow_origin = if configured.is_empty() || configured == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = configured
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            // Fallback to any if parsing failed
            AllowOrigin::any()
        } else {
            AllowOrigin::list(origins)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([
            HeaderName::from_static(REQUEST_ID_HEADER),
            HeaderName::from_static("deprecation"),
            HeaderName::from_static("link"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}
