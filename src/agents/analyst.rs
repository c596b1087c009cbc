// ABOUTME: Analyst agent producing daily feedback and weekly failure analysis
// ABOUTME: Builds analysis prompts and validates feedback text and failure rankings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use serde::Deserialize;
use tracing::{info, instrument};

use super::{data_line, user_turn, AgentInput, AgentRole, AgentRuntime};
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::{DAILY_FEEDBACK_CONTRACT, WEEKLY_ANALYSIS_CONTRACT};
use crate::llm::ChatMessage;
use omteam_core::models::{
    DailyFeedbackResult, DayOfWeekFeedback, EncouragementCandidate, FailureReasonRank,
    WeeklyAnalysisResult,
};

const NO_MISSION_RECORD: &str = "해당 날짜의 미션 기록 없음";

// ============================================================================
// Daily feedback
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDailyFeedback {
    #[serde(default)]
    feedback_text: String,
    #[serde(default)]
    encouragement_candidates: Vec<EncouragementCandidate>,
}

/// Build the daily feedback prompt
#[must_use]
pub fn build_daily_feedback_messages(input: &AgentInput<'_>) -> Vec<ChatMessage> {
    let context = input.context;
    let target_date = context
        .target_date
        .unwrap_or_else(|| input.request.timestamp.date_naive());

    let mut lines = vec![
        format!("사용자 ID: {}", input.user_label()),
        format!("분석 대상 날짜: {target_date}"),
        data_line("사용자 컨텍스트", &context.user_context),
    ];
    lines.push(context.today_mission.as_ref().map_or_else(
        || format!("해당 날짜의 미션: {NO_MISSION_RECORD}"),
        |mission| data_line("해당 날짜의 미션", mission),
    ));
    if let Some(summary) = context.recent_summary {
        lines.push(format!(
            "최근 요약: 성공 {}일 / 실패 {}일",
            summary.success_days, summary.failure_days
        ));
    }
    if !context.recent_mission_history.is_empty() {
        lines.push(data_line("최근 미션 이력", &context.recent_mission_history));
    }
    if let Some(text) = input.request.input.display_text() {
        lines.push(format!("사용자 요청: {text}"));
    }

    let mut messages = input.system_messages(AgentRole::Analyst);
    messages.push(user_turn(&lines, DAILY_FEEDBACK_CONTRACT));
    messages
}

fn finalize_daily(raw: RawDailyFeedback) -> AppResult<DailyFeedbackResult> {
    let feedback_text = raw.feedback_text.trim().to_owned();
    if feedback_text.is_empty() {
        return Err(AppError::external_response_invalid(
            AgentRole::Analyst.label(),
            "feedbackText was empty",
        ));
    }

    let encouragement_candidates = raw
        .encouragement_candidates
        .into_iter()
        .filter(|c| !c.message.trim().is_empty())
        .collect();

    Ok(DailyFeedbackResult {
        feedback_text,
        encouragement_candidates,
    })
}

/// Analyze one day's mission outcome
///
/// # Errors
///
/// Propagates provider failures and invalid model output
#[instrument(skip_all, fields(agent = "analysis", kind = "daily"))]
pub async fn daily_feedback(
    runtime: &AgentRuntime,
    input: &AgentInput<'_>,
) -> AppResult<DailyFeedbackResult> {
    let raw: RawDailyFeedback = runtime
        .invoke_structured(AgentRole::Analyst, build_daily_feedback_messages(input))
        .await?;
    let result = finalize_daily(raw)?;
    info!(
        candidates = result.encouragement_candidates.len(),
        "Daily feedback generated"
    );
    Ok(result)
}

// ============================================================================
// Weekly analysis
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWeeklyAnalysis {
    #[serde(default)]
    failure_reason_ranking: Vec<FailureReasonRank>,
    #[serde(default)]
    weekly_feedback: String,
    #[serde(default)]
    day_of_week_feedback: Option<DayOfWeekFeedback>,
}

/// Build the weekly analysis prompt
#[must_use]
pub fn build_weekly_analysis_messages(input: &AgentInput<'_>) -> Vec<ChatMessage> {
    let context = input.context;
    let week = context.week_range.map_or_else(
        || "미지정".to_owned(),
        |range| format!("{} ~ {}", range.start, range.end),
    );

    let lines = vec![
        format!("사용자 ID: {}", input.user_label()),
        format!("분석 주간: {week}"),
        data_line("사용자 컨텍스트", &context.user_context),
        data_line("주간 통계", &context.weekly_stats),
        data_line("주간 실패 사유 집계", &context.failure_reasons_ranked),
        data_line("주간 실패 사유", &context.weekly_failure_reasons),
        data_line("최근 미션 이력", &context.recent_mission_history),
        data_line("월간 요일별 통계", &context.monthly_day_of_week_stats),
    ];

    let mut messages = input.system_messages(AgentRole::Analyst);
    messages.push(user_turn(&lines, WEEKLY_ANALYSIS_CONTRACT));
    messages
}

fn finalize_weekly(
    raw: RawWeeklyAnalysis,
    input: &AgentInput<'_>,
) -> AppResult<WeeklyAnalysisResult> {
    let weekly_feedback = raw.weekly_feedback.trim().to_owned();
    if weekly_feedback.is_empty() {
        return Err(AppError::external_response_invalid(
            AgentRole::Analyst.label(),
            "weeklyFeedback was empty",
        ));
    }

    let mut failure_reason_ranking = raw.failure_reason_ranking;
    if failure_reason_ranking.is_empty() {
        failure_reason_ranking = FailureReasonRank::rank_counts(&input.context.failure_reasons_ranked);
    }
    failure_reason_ranking.sort_by_key(|entry| entry.rank);

    let day_of_week_feedback = raw
        .day_of_week_feedback
        .filter(|f| !f.title.trim().is_empty() || !f.content.trim().is_empty());

    Ok(WeeklyAnalysisResult {
        failure_reason_ranking,
        weekly_feedback,
        day_of_week_feedback,
    })
}

/// Analyze a full week of mission outcomes
///
/// # Errors
///
/// Propagates provider failures and invalid model output
#[instrument(skip_all, fields(agent = "analysis", kind = "weekly"))]
pub async fn weekly_analysis(
    runtime: &AgentRuntime,
    input: &AgentInput<'_>,
) -> AppResult<WeeklyAnalysisResult> {
    let raw: RawWeeklyAnalysis = runtime
        .invoke_structured(AgentRole::Analyst, build_weekly_analysis_messages(input))
        .await?;
    let result = finalize_weekly(raw, input)?;
    info!(
        ranked_reasons = result.failure_reason_ranking.len(),
        has_day_of_week = result.day_of_week_feedback.is_some(),
        "Weekly analysis generated"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use chrono::Utc;
    use omteam_core::models::{AiChatRequest, AiRequestContext, ChatInput, FailureReasonCount};

    fn request() -> AiChatRequest {
        AiChatRequest {
            user_id: None,
            session_id: None,
            input: ChatInput::text("이번 주 어땠어?"),
            context: None,
            timestamp: Utc::now(),
            intent: None,
        }
    }

    #[test]
    fn test_daily_prompt_mentions_missing_mission() {
        let request = request();
        let context = AiRequestContext::default();
        let input = AgentInput::new(&request, &context, None);
        let messages = build_daily_feedback_messages(&input);
        let last = messages.last().unwrap();
        assert!(last.content.contains(NO_MISSION_RECORD));
        assert!(last.content.contains("feedbackText"));
    }

    #[test]
    fn test_blank_feedback_is_rejected() {
        let err = finalize_daily(RawDailyFeedback {
            feedback_text: "  ".to_owned(),
            encouragement_candidates: Vec::new(),
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalResponseInvalid);
    }

    #[test]
    fn test_weekly_ranking_derived_from_context() {
        let request = request();
        let context = AiRequestContext {
            failure_reasons_ranked: vec![
                FailureReasonCount {
                    reason: "피로".to_owned(),
                    count: 1,
                },
                FailureReasonCount {
                    reason: "시간 부족".to_owned(),
                    count: 3,
                },
            ],
            ..AiRequestContext::default()
        };
        let input = AgentInput::new(&request, &context, None);

        let result = finalize_weekly(
            RawWeeklyAnalysis {
                failure_reason_ranking: Vec::new(),
                weekly_feedback: "수고했어요".to_owned(),
                day_of_week_feedback: None,
            },
            &input,
        )
        .unwrap();

        assert_eq!(result.failure_reason_ranking[0].category, "시간 부족");
        assert_eq!(result.failure_reason_ranking[0].rank, 1);
        assert_eq!(result.failure_reason_ranking[1].rank, 2);
    }

    #[test]
    fn test_weekly_ranking_sorted_by_rank() {
        let request = request();
        let context = AiRequestContext::default();
        let input = AgentInput::new(&request, &context, None);
        let raw: RawWeeklyAnalysis = serde_json::from_str(
            r#"{"failureReasonRanking":[{"rank":2,"category":"피로","count":2},
                {"rank":1,"category":"야근","count":4}],
                "weeklyFeedback":"좋아요",
                "dayOfWeekFeedback":{"title":"","content":""}}"#,
        )
        .unwrap();

        let result = finalize_weekly(raw, &input).unwrap();
        assert_eq!(result.failure_reason_ranking[0].category, "야근");
        assert!(result.day_of_week_feedback.is_none());
    }
}
