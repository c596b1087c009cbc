// ABOUTME: Core types and constants for the Omteam AI server
// ABOUTME: Foundation crate with error handling, request/response DTOs, and limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

#![deny(unsafe_code)]

//! # Omteam Core
//!
//! Foundation crate providing shared types for the Omteam AI server. The
//! server crate depends on it for everything that crosses the HTTP boundary,
//! which keeps the DTOs and error codes stable while the agent code changes.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **models**: Request context, agent results and the `UnifiedAiResponse` envelope
//! - **constants**: Validation limits shared by the request schema and the agents

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Validation limits shared across crates
pub mod constants;

/// Request and response data transfer objects
pub mod models;
