// ABOUTME: Request and response data transfer objects for the AI endpoints
// ABOUTME: camelCase JSON fields and SCREAMING_SNAKE_CASE enum values throughout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! Data models
//!
//! Every type here is scoped to a single HTTP call. Nothing is persisted.

/// Daily feedback and weekly analysis results
pub mod analysis;
/// Chat input, history and bot replies
pub mod chat;
/// User profile, onboarding, history and statistics
pub mod context;
/// Recommended missions
pub mod mission;
/// Unified request envelope
pub mod request;
/// Unified response envelope
pub mod response;

pub use analysis::{
    DailyFeedbackResult, DayOfWeekFeedback, EncouragementCandidate, FailureReasonRank,
    FeedbackIntent, WeeklyAnalysisResult,
};
pub use chat::{
    BotMessage, BotMessageOption, ChatInput, ChatInputType, ChatReply, ChatState,
    ConversationHistoryEntry, ConversationRole,
};
pub use context::{
    DayOfWeekStat, FailureReasonCount, LifestyleType, MissionHistoryEntry, MissionResult,
    MissionType, Onboarding, RecentSummary, TodayMission, UserContext, WeekRange, WeeklyStats,
    WorkTimeType,
};
pub use mission::{DailyMissionResult, Mission};
pub use request::{AiChatRequest, AiIntent, AiRequestContext, ExternalId};
pub use response::{AiErrorDetail, AiPayload, UnifiedAiResponse};
