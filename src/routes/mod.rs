// ABOUTME: Route module organization for the Omteam AI server HTTP endpoints
// ABOUTME: Groups the AI endpoints and the health endpoints behind route builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! Route module for the Omteam AI server
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the AI pipeline.

/// Unified and deprecated AI endpoints
pub mod ai;
/// Health check and system status routes
pub mod health;

/// AI route handlers
pub use ai::AiRoutes;
/// Health route handlers
pub use health::{HealthRoutes, HealthStatus};
