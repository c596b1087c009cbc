// ABOUTME: Mission planner agent recommending today's exercise and diet missions
// ABOUTME: Builds the planner prompt and normalizes the model's mission list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::{data_line, user_turn, AgentInput, AgentRole, AgentRuntime};
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::DAILY_MISSION_CONTRACT;
use crate::llm::ChatMessage;
use omteam_core::constants::missions::RECOMMENDED_MISSION_COUNT;
use omteam_core::models::{DailyMissionResult, Mission, MissionType};

/// Mission as the model writes it, before clamping
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMission {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    mission_type: MissionType,
    #[serde(default)]
    difficulty: f64,
    #[serde(default)]
    estimated_minutes: f64,
    #[serde(default)]
    estimated_calories: f64,
}

#[derive(Debug, Deserialize)]
struct RawMissionPlan {
    #[serde(default)]
    missions: Vec<RawMission>,
}

/// Round and clamp a model number into `u32`, negatives become zero
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn non_negative(value: f64) -> u32 {
    // Clamped to the u32 range before the cast
    value.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

impl From<RawMission> for Mission {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from(raw: RawMission) -> Self {
        Self {
            name: raw.name,
            mission_type: raw.mission_type,
            // Clamped to 0..=255; normalized() narrows to 1..=5
            difficulty: raw.difficulty.round().clamp(0.0, 255.0) as u8,
            estimated_minutes: non_negative(raw.estimated_minutes),
            estimated_calories: non_negative(raw.estimated_calories),
        }
        .normalized()
    }
}

/// Build the planner prompt
#[must_use]
pub fn build_messages(input: &AgentInput<'_>) -> Vec<ChatMessage> {
    let context = input.context;
    let mut lines = vec![
        format!("사용자 ID: {}", input.user_label()),
        data_line("사용자 컨텍스트", &context.user_context),
        data_line("온보딩 데이터", &context.onboarding),
        data_line("최근 미션 이력", &context.recent_mission_history),
        data_line("주간 주요 실패 원인", &context.weekly_failure_reasons),
    ];
    if let Some(text) = input.request.input.display_text() {
        lines.push(format!("사용자 요청: {text}"));
    }

    let mut messages = input.system_messages(AgentRole::Planner);
    messages.push(user_turn(&lines, DAILY_MISSION_CONTRACT));
    messages
}

/// Clean up the model's mission list
///
/// # Errors
///
/// Returns `ExternalResponseInvalid` when no usable mission remains
fn finalize(plan: RawMissionPlan) -> AppResult<DailyMissionResult> {
    let returned = plan.missions.len();
    let missions: Vec<Mission> = plan
        .missions
        .into_iter()
        .map(Mission::from)
        .filter(|mission| !mission.name.is_empty())
        .take(RECOMMENDED_MISSION_COUNT)
        .collect();

    if missions.is_empty() {
        return Err(AppError::external_response_invalid(
            AgentRole::Planner.label(),
            "model returned no missions",
        ));
    }
    if returned != missions.len() {
        warn!(
            returned,
            kept = missions.len(),
            "Planner output trimmed to the recommended mission count"
        );
    }

    Ok(DailyMissionResult { missions })
}

/// Recommend today's missions
///
/// # Errors
///
/// Propagates provider failures and invalid model output
#[instrument(skip_all, fields(agent = "planner"))]
pub async fn recommend_missions(
    runtime: &AgentRuntime,
    input: &AgentInput<'_>,
) -> AppResult<DailyMissionResult> {
    let plan: RawMissionPlan = runtime
        .invoke_structured(AgentRole::Planner, build_messages(input))
        .await?;
    let result = finalize(plan)?;
    info!(missions = result.missions.len(), "Daily missions recommended");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn plan(json: &str) -> RawMissionPlan {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_finalize_clamps_values() {
        let result = finalize(plan(
            r#"{"missions":[{"name":"점심 산책","type":"EXERCISE","difficulty":7,
                "estimatedMinutes":-5,"estimatedCalories":80.4}]}"#,
        ))
        .unwrap();

        let mission = &result.missions[0];
        assert_eq!(mission.difficulty, 5);
        assert_eq!(mission.estimated_minutes, 0);
        assert_eq!(mission.estimated_calories, 80);
    }

    #[test]
    fn test_finalize_caps_mission_count() {
        let result = finalize(plan(
            r#"{"missions":[
                {"name":"a","type":"EXERCISE","difficulty":1},
                {"name":"b","type":"DIET","difficulty":2},
                {"name":"c","type":"EXERCISE","difficulty":3},
                {"name":"d","type":"DIET","difficulty":4}]}"#,
        ))
        .unwrap();
        assert_eq!(result.missions.len(), RECOMMENDED_MISSION_COUNT);
    }

    #[test]
    fn test_finalize_rejects_empty_list() {
        let err = finalize(plan(r#"{"missions":[]}"#)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalResponseInvalid);

        let err = finalize(plan(r#"{"missions":[{"name":"   ","type":"DIET"}]}"#)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalResponseInvalid);
    }
}
