// ABOUTME: Daily feedback and weekly analysis result models returned by the analyst agent
// ABOUTME: Shapes mirror the dailyFeedback and weeklyAnalysis fields of the unified response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use serde::{Deserialize, Serialize};

use super::context::FailureReasonCount;

/// Tone of an encouragement message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackIntent {
    /// Celebrate a success
    Praise,
    /// Invite another attempt after a failure
    Retry,
    /// Neutral check-in
    Normal,
    /// Nudge toward more effort
    Push,
}

/// Candidate message for the app's home screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncouragementCandidate {
    /// Tone
    pub intent: FeedbackIntent,
    /// Headline
    pub title: String,
    /// Body
    pub message: String,
}

/// Payload of the `dailyFeedback` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyFeedbackResult {
    /// Analytical feedback sentence for the day
    pub feedback_text: String,
    /// Encouragement messages to pick from
    #[serde(default)]
    pub encouragement_candidates: Vec<EncouragementCandidate>,
}

/// One entry of the failure ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReasonRank {
    /// 1-based rank
    pub rank: u32,
    /// Reason category
    pub category: String,
    /// Occurrences in the week
    #[serde(default)]
    pub count: u32,
}

impl FailureReasonRank {
    /// Rank the app's pre-counted reasons by descending count, keeping input order on ties
    #[must_use]
    pub fn rank_counts(reasons: &[FailureReasonCount]) -> Vec<Self> {
        let mut sorted: Vec<&FailureReasonCount> = reasons.iter().collect();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
            .into_iter()
            .zip(1_u32..)
            .map(|(reason, rank)| Self {
                rank,
                category: reason.reason.clone(),
                count: reason.count,
            })
            .collect()
    }
}

/// Weekday-focused advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOfWeekFeedback {
    /// Headline
    pub title: String,
    /// Body
    pub content: String,
}

/// Payload of the `weeklyAnalysis` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAnalysisResult {
    /// Failure reasons ordered by rank
    #[serde(default)]
    pub failure_reason_ranking: Vec<FailureReasonRank>,
    /// Overall feedback for the week
    pub weekly_feedback: String,
    /// Weekday advice, null when there is not enough data
    #[serde(default)]
    pub day_of_week_feedback: Option<DayOfWeekFeedback>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_counts_orders_by_count() {
        let reasons = vec![
            FailureReasonCount {
                reason: "피로".to_owned(),
                count: 2,
            },
            FailureReasonCount {
                reason: "시간 부족".to_owned(),
                count: 3,
            },
            FailureReasonCount {
                reason: "날씨".to_owned(),
                count: 2,
            },
        ];

        let ranking = FailureReasonRank::rank_counts(&reasons);

        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0].category, "시간 부족");
        assert_eq!(ranking[0].rank, 1);
        assert_eq!(ranking[1].category, "피로");
        assert_eq!(ranking[2].category, "날씨");
        assert_eq!(ranking[2].rank, 3);
    }

    #[test]
    fn test_weekly_result_without_day_of_week() {
        let result: WeeklyAnalysisResult =
            serde_json::from_str(r#"{"weeklyFeedback":"좋은 한 주였어요"}"#).unwrap();
        assert!(result.failure_reason_ranking.is_empty());
        assert!(result.day_of_week_feedback.is_none());
    }
}
