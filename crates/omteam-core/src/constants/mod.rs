// ABOUTME: Validation limits shared by request schemas and agent output normalization
// ABOUTME: Pure data constants with no runtime configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! Constants module
//!
//! Limits are grouped by the concern they bound. Runtime-tunable values live
//! in the server's configuration layer instead.

/// Limits applied to caller input
pub mod input {
    /// Maximum characters accepted in `input.text`
    pub const MAX_INPUT_TEXT_CHARS: usize = 2000;

    /// Maximum conversation history entries replayed into a chat prompt
    pub const MAX_CONVERSATION_HISTORY: usize = 40;
}

/// Limits applied to recommended missions
pub mod missions {
    /// Number of missions the planner is asked to recommend
    pub const RECOMMENDED_MISSION_COUNT: usize = 3;

    /// Maximum characters in a mission name
    pub const MAX_MISSION_NAME_CHARS: usize = 20;

    /// Lowest difficulty level
    pub const MIN_DIFFICULTY: u8 = 1;

    /// Highest difficulty level
    pub const MAX_DIFFICULTY: u8 = 5;
}
