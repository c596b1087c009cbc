// ABOUTME: Daily mission recommendation models returned by the planner agent
// ABOUTME: Includes normalization that enforces name length and difficulty bounds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use serde::{Deserialize, Serialize};

use super::context::MissionType;
use crate::constants::missions::{MAX_DIFFICULTY, MAX_MISSION_NAME_CHARS, MIN_DIFFICULTY};

/// One recommended mission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    /// Short mission title
    pub name: String,
    /// Mission category
    #[serde(rename = "type")]
    pub mission_type: MissionType,
    /// Difficulty 1 to 5
    pub difficulty: u8,
    /// Expected duration in minutes
    #[serde(default)]
    pub estimated_minutes: u32,
    /// Expected energy use in kcal
    #[serde(default)]
    pub estimated_calories: u32,
}

impl Mission {
    /// Truncate the name and clamp difficulty into range
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let trimmed = self.name.trim();
        self.name = trimmed.chars().take(MAX_MISSION_NAME_CHARS).collect();
        self.difficulty = self.difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
        self
    }
}

/// Payload of the `dailyMission` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMissionResult {
    /// Recommended missions, never empty once normalized
    pub missions: Vec<Mission>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_truncates_by_chars() {
        let mission = Mission {
            name: "  점심시간에 회사 근처 공원을 가볍게 산책하고 돌아오기  ".to_owned(),
            mission_type: MissionType::Exercise,
            difficulty: 9,
            estimated_minutes: 20,
            estimated_calories: 80,
        }
        .normalized();

        assert_eq!(mission.name.chars().count(), MAX_MISSION_NAME_CHARS);
        assert!(mission.name.starts_with("점심시간에"));
        assert_eq!(mission.difficulty, MAX_DIFFICULTY);
    }

    #[test]
    fn test_normalized_raises_zero_difficulty() {
        let mission = Mission {
            name: "물 2L 마시기".to_owned(),
            mission_type: MissionType::Diet,
            difficulty: 0,
            estimated_minutes: 0,
            estimated_calories: 0,
        }
        .normalized();

        assert_eq!(mission.difficulty, MIN_DIFFICULTY);
        assert_eq!(mission.name, "물 2L 마시기");
    }
}
