// ABOUTME: Request ID middleware for correlation across logs, spans and error bodies
// ABOUTME: Reuses an incoming x-request-id or generates a UUID and echoes it on the response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::constants::REQUEST_ID_HEADER;

/// Longest caller-supplied id we accept before generating our own
const MAX_REQUEST_ID_LEN: usize = 128;

/// Correlation id of the current request, available as an axum `Extension`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Fresh UUID v4 id
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the id
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_header(value: &HeaderValue) -> Option<Self> {
        let raw = value.to_str().ok()?.trim();
        let acceptable = !raw.is_empty()
            && raw.len() <= MAX_REQUEST_ID_LEN
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'));
        acceptable.then(|| Self(raw.to_owned()))
    }
}

/// Attach a request id to the request, its span and the response
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(RequestId::from_header)
        .unwrap_or_else(RequestId::generate);

    request.extensions_mut().insert(request_id.clone());

    let span = info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id.as_str(),
    );

    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_validation() {
        let ok = HeaderValue::from_static("req_abc-123");
        assert_eq!(RequestId::from_header(&ok).unwrap().as_str(), "req_abc-123");

        let spaces = HeaderValue::from_static("has spaces");
        assert!(RequestId::from_header(&spaces).is_none());

        let long = HeaderValue::from_str(&"a".repeat(MAX_REQUEST_ID_LEN + 1)).unwrap();
        assert!(RequestId::from_header(&long).is_none());
    }

    #[test]
    fn test_generated_id_is_uuid() {
        let id = RequestId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }
}
