// ABOUTME: Error handling re-exports from the omteam-core crate
// ABOUTME: Server modules import AppError and ErrorCode through this path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! # Unified Error Handling System
//!
//! The error types live in `omteam-core` so the DTO crate can render them into
//! the unified response envelope. The `http-response` feature of that crate
//! provides `AppError::status_code` and the axum `IntoResponse` implementation.
//! Route handlers go through `agents::assembler`, which shares the status
//! mapping; the deadline middleware and the not-found fallback return
//! `AppError` directly.

pub use omteam_core::errors::{AppError, AppResult, ErrorCode};
