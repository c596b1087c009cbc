// ABOUTME: Unified AI request envelope accepted by POST /ai/chat/messages
// ABOUTME: Defines intents, caller identifiers, the optional context bag and request validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{self, Display, Formatter};

use super::chat::{ChatInput, ChatInputType, ConversationHistoryEntry};
use super::context::{
    DayOfWeekStat, FailureReasonCount, MissionHistoryEntry, Onboarding, RecentSummary,
    TodayMission, UserContext, WeekRange, WeeklyStats,
};
use crate::constants::input::MAX_INPUT_TEXT_CHARS;
use crate::constants::missions::{MAX_DIFFICULTY, MIN_DIFFICULTY};
use crate::errors::{AppError, AppResult};

/// AI feature a request is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiIntent {
    /// Recommend today's missions
    DailyMission,
    /// Feedback on a single day
    DailyFeedback,
    /// Analysis of a full week
    WeeklyAnalysis,
    /// Continue the chatbot conversation
    Chat,
}

impl AiIntent {
    /// Wire name of the intent
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DailyMission => "DAILY_MISSION",
            Self::DailyFeedback => "DAILY_FEEDBACK",
            Self::WeeklyAnalysis => "WEEKLY_ANALYSIS",
            Self::Chat => "CHAT",
        }
    }
}

impl Display for AiIntent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Identifiers and timestamps
// ============================================================================

/// Caller-side identifier that the app may send as a string or an integer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ExternalId(String);

impl ExternalId {
    /// Wrap an identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty after trimming
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for ExternalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ExternalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
        })
    }
}

/// Accepts RFC 3339 or a naive ISO-8601 date-time interpreted as UTC
pub mod flexible_timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    /// Parse a timestamp in either accepted form
    #[must_use]
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let trimmed = raw.trim();
        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }

    /// Serialize as RFC 3339
    ///
    /// # Errors
    ///
    /// Propagates serializer errors
    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// Deserialize from RFC 3339 or naive ISO-8601
    ///
    /// # Errors
    ///
    /// Fails when the string matches neither form
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}

// ============================================================================
// Context bag
// ============================================================================

/// Optional structured data the app sends alongside the user's input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiRequestContext {
    /// Profile snapshot
    #[serde(default)]
    pub user_context: Option<UserContext>,
    /// Onboarding answers
    #[serde(default)]
    pub onboarding: Option<Onboarding>,
    /// Recent mission outcomes, newest last
    #[serde(default)]
    pub recent_mission_history: Vec<MissionHistoryEntry>,
    /// Free-text failure reasons of the current week
    #[serde(default)]
    pub weekly_failure_reasons: Vec<String>,
    /// Day analysed by daily feedback
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    /// Mission of the analysed day
    #[serde(default)]
    pub today_mission: Option<TodayMission>,
    /// Recent success and failure day counts
    #[serde(default)]
    pub recent_summary: Option<RecentSummary>,
    /// Analysed week
    #[serde(default)]
    pub week_range: Option<WeekRange>,
    /// Week outcome counts
    #[serde(default)]
    pub weekly_stats: Option<WeeklyStats>,
    /// Failure reasons counted by the app
    #[serde(default)]
    pub failure_reasons_ranked: Vec<FailureReasonCount>,
    /// Weekday outcome counts over the last month
    #[serde(default)]
    pub monthly_day_of_week_stats: Vec<DayOfWeekStat>,
    /// Earlier chat turns, oldest first
    #[serde(default)]
    pub conversation_history: Vec<ConversationHistoryEntry>,
}

impl AiRequestContext {
    /// Any of the week-analysis fields is present
    #[must_use]
    pub fn has_weekly_signals(&self) -> bool {
        self.week_range.is_some()
            || self.weekly_stats.is_some()
            || !self.failure_reasons_ranked.is_empty()
            || !self.monthly_day_of_week_stats.is_empty()
    }

    /// Any of the day-feedback fields is present
    #[must_use]
    pub fn has_daily_feedback_signals(&self) -> bool {
        self.today_mission.is_some() || self.recent_summary.is_some() || self.target_date.is_some()
    }

    /// Onboarding answers are present
    #[must_use]
    pub const fn has_onboarding(&self) -> bool {
        self.onboarding.is_some()
    }

    /// Intents whose context fields are present, in rule priority order
    #[must_use]
    pub fn signalled_intents(&self) -> Vec<AiIntent> {
        [
            (self.has_weekly_signals(), AiIntent::WeeklyAnalysis),
            (self.has_daily_feedback_signals(), AiIntent::DailyFeedback),
            (self.has_onboarding(), AiIntent::DailyMission),
        ]
        .into_iter()
        .filter_map(|(present, intent)| present.then_some(intent))
        .collect()
    }

    fn validate(&self) -> AppResult<()> {
        if let Some(rate) = self
            .user_context
            .as_ref()
            .and_then(|u| u.recent_mission_success_rate)
        {
            if !(0.0..=100.0).contains(&rate) {
                return Err(AppError::out_of_range(format!(
                    "context.userContext.recentMissionSuccessRate must be between 0 and 100, got {rate}"
                )));
            }
        }

        let difficulties = self
            .recent_mission_history
            .iter()
            .filter_map(|entry| entry.difficulty)
            .chain(self.today_mission.as_ref().and_then(|m| m.difficulty));
        for difficulty in difficulties {
            if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
                return Err(AppError::out_of_range(format!(
                    "mission difficulty must be between {MIN_DIFFICULTY} and {MAX_DIFFICULTY}, got {difficulty}"
                )));
            }
        }

        if let Some(range) = self.week_range {
            if range.start > range.end {
                return Err(AppError::invalid_input(
                    "context.weekRange.start must not be after context.weekRange.end",
                ));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// Request body of the unified AI endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiChatRequest {
    /// App user identifier
    #[serde(default)]
    pub user_id: Option<ExternalId>,
    /// Chat session identifier
    #[serde(default)]
    pub session_id: Option<ExternalId>,
    /// The user's current turn
    pub input: ChatInput,
    /// Structured data for the agents
    #[serde(default)]
    pub context: Option<AiRequestContext>,
    /// Client-side time of the request
    #[serde(with = "flexible_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Explicit routing override
    #[serde(default)]
    pub intent: Option<AiIntent>,
}

impl AiChatRequest {
    /// Context bag, or an empty one when absent
    #[must_use]
    pub fn context_or_default(&self) -> AiRequestContext {
        self.context.clone().unwrap_or_default()
    }

    /// Check the request beyond what deserialization enforces
    ///
    /// # Errors
    ///
    /// Returns a 400-class `AppError` naming the offending field
    pub fn validate(&self) -> AppResult<()> {
        self.validate_input()?;

        if self.user_id.as_ref().is_some_and(ExternalId::is_blank) {
            return Err(AppError::invalid_input("userId must not be blank"));
        }
        if self.session_id.as_ref().is_some_and(ExternalId::is_blank) {
            return Err(AppError::invalid_input("sessionId must not be blank"));
        }

        if let Some(context) = &self.context {
            context.validate()?;
        }

        Ok(())
    }

    fn validate_input(&self) -> AppResult<()> {
        match self.input.input_type {
            ChatInputType::Text => {
                let text = self
                    .input
                    .trimmed_text()
                    .ok_or_else(|| AppError::missing_field("input.text"))?;
                let length = text.chars().count();
                if length > MAX_INPUT_TEXT_CHARS {
                    return Err(AppError::out_of_range(format!(
                        "input.text must be at most {MAX_INPUT_TEXT_CHARS} characters, got {length}"
                    )));
                }
            }
            ChatInputType::Selection => {
                if self.input.trimmed_value().is_none() && self.input.trimmed_text().is_none() {
                    return Err(AppError::missing_field("input.value"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use serde_json::json;

    fn request(body: serde_json::Value) -> AiChatRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_ids_accept_strings_and_integers() {
        let req = request(json!({
            "userId": 42,
            "sessionId": "s-1",
            "input": {"type": "TEXT", "text": "안녕"},
            "timestamp": "2025-01-15T09:00:00Z"
        }));
        assert_eq!(req.user_id.unwrap().as_str(), "42");
        assert_eq!(req.session_id.unwrap().as_str(), "s-1");
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let req = request(json!({
            "input": {"type": "TEXT", "text": "안녕"},
            "timestamp": "2025-01-15T09:00:00"
        }));
        assert_eq!(req.timestamp.to_rfc3339(), "2025-01-15T09:00:00+00:00");
    }

    #[test]
    fn test_missing_timestamp_is_rejected() {
        let result: Result<AiChatRequest, _> =
            serde_json::from_value(json!({"input": {"type": "TEXT", "text": "안녕"}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_text_fails_validation() {
        let req = request(json!({
            "input": {"type": "TEXT", "text": "  "},
            "timestamp": "2025-01-15T09:00:00Z"
        }));
        let error = req.validate().unwrap_err();
        assert_eq!(error.code, ErrorCode::MissingRequiredField);
    }

    #[test]
    fn test_option_requires_value_or_text() {
        let req = request(json!({
            "input": {"type": "OPTION"},
            "timestamp": "2025-01-15T09:00:00Z"
        }));
        assert!(req.validate().is_err());

        let req = request(json!({
            "input": {"type": "OPTION", "value": "YES"},
            "timestamp": "2025-01-15T09:00:00Z"
        }));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_success_rate_out_of_range() {
        let req = request(json!({
            "input": {"type": "TEXT", "text": "미션 추천해줘"},
            "context": {"userContext": {"recentMissionSuccessRate": 140}},
            "timestamp": "2025-01-15T09:00:00Z"
        }));
        assert_eq!(req.validate().unwrap_err().code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_signalled_intents_priority_order() {
        let context: AiRequestContext = serde_json::from_value(json!({
            "onboarding": {"appGoal": "체중 감량"},
            "targetDate": "2025-01-15",
            "weekRange": {"start": "2025-01-13", "end": "2025-01-19"}
        }))
        .unwrap();
        assert_eq!(
            context.signalled_intents(),
            vec![
                AiIntent::WeeklyAnalysis,
                AiIntent::DailyFeedback,
                AiIntent::DailyMission
            ]
        );
    }
}
