// ABOUTME: System prompts for LLM interactions loaded at compile time
// ABOUTME: Provides the safety, orchestrator, agent role and JSON output contract prompts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! # System Prompts
//!
//! Prompts are loaded at compile time from markdown files for easy
//! maintenance. Every agent prompt starts with [`SAFETY_SYSTEM_PROMPT`].

/// Safety and tone guidelines shared by every agent
pub const SAFETY_SYSTEM_PROMPT: &str = include_str!("safety.md");

/// Agent selector prompt used by the optional LLM intent classifier
pub const ORCHESTRATOR_SYSTEM_PROMPT: &str = include_str!("orchestrator.md");

/// Mission planner role
pub const PLANNER_ROLE_PROMPT: &str = include_str!("planner.md");

/// Daily/weekly analyst role
pub const ANALYST_ROLE_PROMPT: &str = include_str!("analyst.md");

/// Conversational coach role
pub const COACH_ROLE_PROMPT: &str = include_str!("coach.md");

/// Output contract for daily mission recommendations
pub const DAILY_MISSION_CONTRACT: &str = include_str!("daily_mission_contract.md");

/// Output contract for daily feedback
pub const DAILY_FEEDBACK_CONTRACT: &str = include_str!("daily_feedback_contract.md");

/// Output contract for weekly analysis
pub const WEEKLY_ANALYSIS_CONTRACT: &str = include_str!("weekly_analysis_contract.md");

/// Output contract for the next chatbot turn
pub const CHAT_CONTRACT: &str = include_str!("chat_contract.md");

/// Safety prompt followed by an agent role prompt
#[must_use]
pub fn compose_system_prompt(role_prompt: &str) -> String {
    format!("{SAFETY_SYSTEM_PROMPT}\n{role_prompt}")
}

/// User turn sent to the LLM intent classifier
#[must_use]
pub fn orchestrator_user_prompt(user_request: &str) -> String {
    format!(
        "사용자 요청: {user_request}\n\n\
         이 요청에 가장 적절한 에이전트를 선택하세요 (planner/coach/analysis 중 하나만):"
    )
}
