// ABOUTME: UnifiedAiResponse envelope returned by every AI endpoint
// ABOUTME: Constructors guarantee that exactly one payload or only the error is populated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! # Unified Response Envelope
//!
//! All five keys are always serialized, with `null` for absent fields. The
//! fields are private so the only way to build an envelope is through a
//! constructor that populates a single payload, or through [`UnifiedAiResponse::failure`].

use serde::{Deserialize, Serialize};

use super::analysis::{DailyFeedbackResult, WeeklyAnalysisResult};
use super::chat::ChatReply;
use super::mission::DailyMissionResult;
use super::request::AiIntent;
use crate::errors::{AppError, ErrorCode};

/// Error field of the envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiErrorDetail {
    /// Stable error code
    pub code: ErrorCode,
    /// Caller-facing message
    pub message: String,
    /// Correlation identifier echoed from `x-request-id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl From<&AppError> for AiErrorDetail {
    fn from(error: &AppError) -> Self {
        // Server-side faults keep their details in the logs
        let message = match error.code {
            ErrorCode::InternalError
            | ErrorCode::ConfigError
            | ErrorCode::SerializationError => error.code.description().to_owned(),
            _ => error.message.clone(),
        };
        Self {
            code: error.code,
            message,
            request_id: error.request_id.clone(),
        }
    }
}

/// Output of exactly one agent
#[derive(Debug, Clone, PartialEq)]
pub enum AiPayload {
    /// Planner output
    DailyMission(DailyMissionResult),
    /// Analyst output for a day
    DailyFeedback(DailyFeedbackResult),
    /// Analyst output for a week
    WeeklyAnalysis(WeeklyAnalysisResult),
    /// Coach output
    Chat(ChatReply),
}

impl AiPayload {
    /// Intent this payload answers
    #[must_use]
    pub const fn intent(&self) -> AiIntent {
        match self {
            Self::DailyMission(_) => AiIntent::DailyMission,
            Self::DailyFeedback(_) => AiIntent::DailyFeedback,
            Self::WeeklyAnalysis(_) => AiIntent::WeeklyAnalysis,
            Self::Chat(_) => AiIntent::Chat,
        }
    }
}

/// Response envelope of the AI endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedAiResponse {
    daily_mission: Option<DailyMissionResult>,
    daily_feedback: Option<DailyFeedbackResult>,
    weekly_analysis: Option<WeeklyAnalysisResult>,
    chat: Option<ChatReply>,
    error: Option<AiErrorDetail>,
}

impl UnifiedAiResponse {
    const fn empty() -> Self {
        Self {
            daily_mission: None,
            daily_feedback: None,
            weekly_analysis: None,
            chat: None,
            error: None,
        }
    }

    /// Envelope carrying the given agent output
    #[must_use]
    pub fn from_payload(payload: AiPayload) -> Self {
        let mut response = Self::empty();
        match payload {
            AiPayload::DailyMission(result) => response.daily_mission = Some(result),
            AiPayload::DailyFeedback(result) => response.daily_feedback = Some(result),
            AiPayload::WeeklyAnalysis(result) => response.weekly_analysis = Some(result),
            AiPayload::Chat(reply) => response.chat = Some(reply),
        }
        response
    }

    /// Envelope with only `dailyMission`
    #[must_use]
    pub fn daily_mission(result: DailyMissionResult) -> Self {
        Self::from_payload(AiPayload::DailyMission(result))
    }

    /// Envelope with only `dailyFeedback`
    #[must_use]
    pub fn daily_feedback(result: DailyFeedbackResult) -> Self {
        Self::from_payload(AiPayload::DailyFeedback(result))
    }

    /// Envelope with only `weeklyAnalysis`
    #[must_use]
    pub fn weekly_analysis(result: WeeklyAnalysisResult) -> Self {
        Self::from_payload(AiPayload::WeeklyAnalysis(result))
    }

    /// Envelope with only `chat`
    #[must_use]
    pub fn chat(reply: ChatReply) -> Self {
        Self::from_payload(AiPayload::Chat(reply))
    }

    /// Envelope with only `error`
    #[must_use]
    pub fn failure(error: &AppError) -> Self {
        Self {
            error: Some(AiErrorDetail::from(error)),
            ..Self::empty()
        }
    }

    /// Mission payload, if any
    #[must_use]
    pub const fn daily_mission_result(&self) -> Option<&DailyMissionResult> {
        self.daily_mission.as_ref()
    }

    /// Daily feedback payload, if any
    #[must_use]
    pub const fn daily_feedback_result(&self) -> Option<&DailyFeedbackResult> {
        self.daily_feedback.as_ref()
    }

    /// Weekly analysis payload, if any
    #[must_use]
    pub const fn weekly_analysis_result(&self) -> Option<&WeeklyAnalysisResult> {
        self.weekly_analysis.as_ref()
    }

    /// Chat payload, if any
    #[must_use]
    pub const fn chat_reply(&self) -> Option<&ChatReply> {
        self.chat.as_ref()
    }

    /// Error detail, if any
    #[must_use]
    pub const fn error_detail(&self) -> Option<&AiErrorDetail> {
        self.error.as_ref()
    }

    /// Number of non-null data fields
    #[must_use]
    pub fn populated_payloads(&self) -> usize {
        [
            self.daily_mission.is_some(),
            self.daily_feedback.is_some(),
            self.weekly_analysis.is_some(),
            self.chat.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    /// Exactly one payload, or only the error
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        match (self.populated_payloads(), self.error.is_some()) {
            (1, false) | (0, true) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::{BotMessage, ChatState};

    fn reply() -> ChatReply {
        ChatReply {
            bot_message: BotMessage {
                message_id: "msg_1".to_owned(),
                text: "오늘은 가볍게 스트레칭부터 해볼까요?".to_owned(),
                options: Vec::new(),
            },
            state: ChatState::default(),
        }
    }

    #[test]
    fn test_all_keys_serialized() {
        let value = serde_json::to_value(UnifiedAiResponse::chat(reply())).unwrap();
        let object = value.as_object().unwrap();

        for key in ["dailyMission", "dailyFeedback", "weeklyAnalysis", "chat", "error"] {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert!(value["dailyMission"].is_null());
        assert_eq!(value["chat"]["botMessage"]["messageId"], "msg_1");
        assert_eq!(value["chat"]["state"]["isTerminal"], false);
    }

    #[test]
    fn test_failure_is_well_formed() {
        let error = AppError::external_service("Upstage", "boom").with_request_id("req-9");
        let response = UnifiedAiResponse::failure(&error);

        assert!(response.is_well_formed());
        assert_eq!(response.populated_payloads(), 0);
        let detail = response.error_detail().unwrap();
        assert_eq!(detail.code, ErrorCode::ExternalServiceError);
        assert_eq!(detail.request_id.as_deref(), Some("req-9"));
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let response = UnifiedAiResponse::failure(&AppError::internal("mutex poisoned"));
        let detail = response.error_detail().unwrap();
        assert_eq!(detail.message, ErrorCode::InternalError.description());
    }

    #[test]
    fn test_payload_constructor_is_well_formed() {
        let response = UnifiedAiResponse::from_payload(AiPayload::Chat(reply()));
        assert!(response.is_well_formed());
        assert!(response.chat_reply().is_some());
        assert!(response.error_detail().is_none());
    }

    #[test]
    fn test_deserialized_mixed_envelope_is_not_well_formed() {
        let response: UnifiedAiResponse = serde_json::from_value(serde_json::json!({
            "dailyMission": {"missions": []},
            "dailyFeedback": null,
            "weeklyAnalysis": null,
            "chat": null,
            "error": {"code": "TIMEOUT", "message": "late"}
        }))
        .unwrap();
        assert!(!response.is_well_formed());
    }
}
