// ABOUTME: Caller-supplied user context models (profile, onboarding, mission history, statistics)
// ABOUTME: Everything here is request-scoped data used to build agent prompts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ============================================================================
// Enumerations
// ============================================================================

/// How the user's working hours are organised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkTimeType {
    /// Fixed office hours
    Fixed,
    /// Rotating shifts
    Shift,
    /// Self-managed hours
    Flexible,
    /// Any value the app adds later
    #[serde(other)]
    Other,
}

/// Coarse description of the user's daily rhythm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifestyleType {
    /// Mostly regular weekday daytime work
    RegularDaytime,
    /// Frequent overtime and irregular evenings
    IrregularOvertime,
    /// Night shifts
    ShiftNight,
    /// Schedule changes every day
    VariableDaily,
    /// Any value the app adds later
    #[serde(other)]
    Other,
}

impl LifestyleType {
    /// Korean label used inside prompts and personalization summaries
    #[must_use]
    pub const fn label_ko(&self) -> &'static str {
        match self {
            Self::RegularDaytime => "규칙적인 주간 근무",
            Self::IrregularOvertime => "야근/불규칙한 일정",
            Self::ShiftNight => "교대 야간 근무",
            Self::VariableDaily => "매일 다른 일정",
            Self::Other => "기타",
        }
    }
}

/// Mission category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionType {
    /// Physical activity
    #[serde(alias = "exercise")]
    Exercise,
    /// Eating habit
    #[serde(alias = "diet")]
    Diet,
}

impl MissionType {
    /// Wire name of the mission type
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exercise => "EXERCISE",
            Self::Diet => "DIET",
        }
    }
}

/// Outcome of a mission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionResult {
    /// Mission completed
    #[serde(alias = "success")]
    Success,
    /// Mission not completed
    #[serde(alias = "FAIL", alias = "fail", alias = "failure")]
    Failure,
}

impl MissionResult {
    /// Whether the mission was completed
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

// ============================================================================
// Time-of-day serde helper
// ============================================================================

/// Accepts `HH:MM` or `HH:MM:SS`, always writes `HH:MM`
pub mod flexible_time {
    use chrono::{NaiveTime, ParseError};

    const OUTPUT_FORMAT: &str = "%H:%M";

    /// Parse a time-of-day string in either accepted form
    ///
    /// # Errors
    ///
    /// Returns the `HH:MM` parse error if neither form matches
    pub fn parse(raw: &str) -> Result<NaiveTime, ParseError> {
        let trimmed = raw.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, OUTPUT_FORMAT))
    }

    /// Optional time-of-day field
    pub mod option {
        use super::{parse, NaiveTime, OUTPUT_FORMAT};
        use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

        /// Serialize as `HH:MM` or null
        ///
        /// # Errors
        ///
        /// Propagates serializer errors
        #[allow(clippy::ref_option)] // serde `with` hands us `&Option<T>`
        pub fn serialize<S: Serializer>(
            value: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(time) => serializer.serialize_str(&time.format(OUTPUT_FORMAT).to_string()),
                None => serializer.serialize_none(),
            }
        }

        /// Deserialize from `HH:MM[:SS]` or null
        ///
        /// # Errors
        ///
        /// Fails on strings that are not a valid time of day
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            raw.map(|value| {
                parse(&value).map_err(|e| D::Error::custom(format!("invalid time '{value}': {e}")))
            })
            .transpose()
        }
    }
}

// ============================================================================
// Context Records
// ============================================================================

/// Snapshot of the user's profile as the app knows it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    /// Display name
    #[serde(default)]
    pub nickname: Option<String>,
    /// Goal chosen in the app (e.g. "체중 감량")
    #[serde(default)]
    pub app_goal: Option<String>,
    /// Recent mission success rate in percent (0 to 100)
    #[serde(default)]
    pub recent_mission_success_rate: Option<f64>,
    /// Gamification level
    #[serde(default)]
    pub level: Option<u32>,
    /// Total successful missions
    #[serde(default)]
    pub success_count: Option<u32>,
    /// Favourite exercise
    #[serde(default)]
    pub preferred_exercise: Option<String>,
    /// Daily rhythm
    #[serde(default)]
    pub lifestyle_type: Option<LifestyleType>,
}

/// Answers collected during onboarding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Onboarding {
    /// Goal chosen during onboarding
    #[serde(default)]
    pub app_goal: Option<String>,
    /// Working hours pattern
    #[serde(default)]
    pub work_time_type: Option<WorkTimeType>,
    /// Start of the daily window available for missions
    #[serde(default, with = "flexible_time::option")]
    pub available_start_time: Option<NaiveTime>,
    /// End of the daily window available for missions
    #[serde(default, with = "flexible_time::option")]
    pub available_end_time: Option<NaiveTime>,
    /// Minimum minutes the user is willing to exercise
    #[serde(default)]
    pub min_exercise_minutes: Option<u32>,
    /// Exercises the user likes
    #[serde(default)]
    pub preferred_exercises: Vec<String>,
    /// Daily rhythm
    #[serde(default)]
    pub lifestyle_type: Option<LifestyleType>,
}

/// One past mission outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionHistoryEntry {
    /// Day the mission was assigned
    pub date: NaiveDate,
    /// Mission category
    pub mission_type: MissionType,
    /// Difficulty 1 to 5
    #[serde(default)]
    pub difficulty: Option<u8>,
    /// Outcome
    pub result: MissionResult,
    /// Reason given when the mission failed
    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// The mission being analysed by daily feedback
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayMission {
    /// Mission name, when the app sends it
    #[serde(default)]
    pub name: Option<String>,
    /// Mission category
    #[serde(default)]
    pub mission_type: Option<MissionType>,
    /// Difficulty 1 to 5
    #[serde(default)]
    pub difficulty: Option<u8>,
    /// Outcome, absent when the day is still open
    #[serde(default)]
    pub result: Option<MissionResult>,
    /// Reason given when the mission failed
    #[serde(default)]
    pub failure_reason: Option<String>,
}

/// Success and failure day counts over the recent window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSummary {
    /// Days with a completed mission
    pub success_days: u32,
    /// Days with a failed mission
    pub failure_days: u32,
}

/// Inclusive date range of the analysed week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRange {
    /// First day
    pub start: NaiveDate,
    /// Last day
    pub end: NaiveDate,
}

/// Aggregate outcome counts for the week
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    /// Days in the window
    pub total_days: u32,
    /// Days with a completed mission
    pub success_days: u32,
    /// Days with a failed mission
    pub failure_days: u32,
}

/// Failure reason with its occurrence count, pre-ranked by the app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReasonCount {
    /// Reason category
    pub reason: String,
    /// Occurrences in the window
    pub count: u32,
}

/// Per-weekday outcome counts over the last month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOfWeekStat {
    /// Weekday name as sent by the app (e.g. "MONDAY")
    pub day_of_week: String,
    /// Completed missions on that weekday
    #[serde(default)]
    pub success_count: u32,
    /// Failed missions on that weekday
    #[serde(default)]
    pub failure_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_onboarding_accepts_both_time_forms() {
        let onboarding: Onboarding = serde_json::from_str(
            r#"{"appGoal":"체중 감량","availableStartTime":"07:30","availableEndTime":"22:00:00"}"#,
        )
        .unwrap();

        assert_eq!(
            onboarding.available_start_time,
            NaiveTime::from_hms_opt(7, 30, 0)
        );
        assert_eq!(
            onboarding.available_end_time,
            NaiveTime::from_hms_opt(22, 0, 0)
        );

        let back = serde_json::to_value(&onboarding).unwrap();
        assert_eq!(back["availableEndTime"], "22:00");
    }

    #[test]
    fn test_onboarding_rejects_bad_time() {
        let result: Result<Onboarding, _> =
            serde_json::from_str(r#"{"availableStartTime":"25:99"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_lifestyle_is_tolerated() {
        let context: UserContext =
            serde_json::from_str(r#"{"lifestyleType":"REMOTE_WORKER"}"#).unwrap();
        assert_eq!(context.lifestyle_type, Some(LifestyleType::Other));
    }

    #[test]
    fn test_mission_result_aliases() {
        let entry: MissionHistoryEntry = serde_json::from_str(
            r#"{"date":"2025-01-02","missionType":"EXERCISE","result":"fail"}"#,
        )
        .unwrap();
        assert_eq!(entry.result, MissionResult::Failure);
        assert!(entry.difficulty.is_none());
    }
}
