// ABOUTME: Unified error type and error codes for the Omteam AI server
// ABOUTME: Maps every failure to a stable code, an HTTP status and a caller-facing message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! # Unified Error Handling System
//!
//! Every failure in the server is expressed as an [`AppError`] carrying an
//! [`ErrorCode`]. The code decides the HTTP status; the message is surfaced
//! to the caller inside the `error` field of the unified response envelope.

#[cfg(feature = "http-response")]
mod http;

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation
    /// The provided input is invalid
    InvalidInput,
    /// A required field is missing
    MissingRequiredField,
    /// The payload is not well-formed JSON
    InvalidFormat,
    /// A value is outside its accepted range
    ValueOutOfRange,
    /// The request did not declare a JSON content type
    UnsupportedMediaType,
    /// The request body exceeded the configured limit
    PayloadTooLarge,

    // Resources
    /// The requested resource does not exist
    ResourceNotFound,

    // External services (the generative model API)
    /// The model API returned an error
    ExternalServiceError,
    /// The model API could not be reached
    ExternalServiceUnavailable,
    /// The model API answered with content that does not match the expected shape
    ExternalResponseInvalid,
    /// The model API rejected our credentials
    ExternalAuthFailed,
    /// The model API rate limited us
    ExternalRateLimited,
    /// The request did not complete in time
    Timeout,

    // Configuration
    /// Configuration error
    ConfigError,

    // Internal
    /// Unexpected internal failure
    InternalError,
    /// Serialization failure
    SerializationError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::InvalidFormat
            | Self::ValueOutOfRange => 400,
            Self::ResourceNotFound => 404,
            Self::PayloadTooLarge => 413,
            Self::UnsupportedMediaType => 415,
            Self::ExternalServiceError
            | Self::ExternalServiceUnavailable
            | Self::ExternalResponseInvalid => 502,
            Self::ExternalAuthFailed | Self::ExternalRateLimited => 503,
            Self::Timeout => 504,
            Self::ConfigError
            | Self::InternalError
            | Self::SerializationError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::InvalidFormat => "The request body is not valid JSON",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::UnsupportedMediaType => "Expected a request with Content-Type: application/json",
            Self::PayloadTooLarge => "The request body is too large",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ExternalServiceError => "The AI model service encountered an error",
            Self::ExternalServiceUnavailable => "The AI model service is currently unavailable",
            Self::ExternalResponseInvalid => "The AI model returned an unexpected response",
            Self::ExternalAuthFailed => "Authentication with the AI model service failed",
            Self::ExternalRateLimited => "The AI model service rate limit was exceeded",
            Self::Timeout => "The request timed out",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Whether the error was caused by the caller rather than the server
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        let status = self.http_status();
        status >= 400 && status < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Serialized names double as the display form
        let name = serde_json::to_value(self)
            .ok()
            .and_then(|value| value.as_str().map(str::to_owned))
            .unwrap_or_else(|| format!("{self:?}"));
        f.write_str(&name)
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Request ID for correlation, when known
    pub request_id: Option<String>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            request_id: None,
            source: None,
        }
    }

    /// Add a request ID to the error
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Missing required field
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("Missing required field: {field}"),
        )
    }

    /// Malformed payload
    #[must_use]
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// Value outside its accepted range
    #[must_use]
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, message)
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service answered with an unusable payload
    #[must_use]
    pub fn external_response_invalid(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalResponseInvalid,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Operation timed out
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Timeout, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
