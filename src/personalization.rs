// ABOUTME: In-memory per-user personalization store feeding agent prompts
// ABOUTME: Tracks preferences, recent mission events and totals with TTL expiry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! # Personalization Store
//!
//! Process-local and best effort. Every request that carries a `userId`
//! updates the user's record from its context, and every agent prompt for
//! that user receives a short Korean summary of the record as an extra
//! system message. Losing the store only makes answers less personal.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::config::SessionConfig;
use omteam_core::models::{AiRequestContext, MissionResult, MissionType, WorkTimeType};

/// Events shown in the summary
const SUMMARY_EVENT_COUNT: usize = 3;

/// One mission outcome remembered for a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionEvent {
    /// Day the mission belonged to
    pub date: NaiveDate,
    /// Mission category
    pub mission_type: MissionType,
    /// Mission name when known
    pub mission: Option<String>,
    /// Outcome
    pub result: MissionResult,
    /// Reason given for a failure
    pub failure_reason: Option<String>,
}

impl MissionEvent {
    fn describe(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        parts.push(format!(
            "미션:{}",
            self.mission
                .as_deref()
                .unwrap_or_else(|| mission_type_label(self.mission_type))
        ));
        parts.push(format!("결과:{}", result_label(self.result)));
        if let Some(reason) = self.failure_reason.as_deref().filter(|r| !r.is_empty()) {
            parts.push(format!("실패이유:{reason}"));
        }
        parts.join(" / ")
    }
}

/// Everything remembered about one user
#[derive(Debug, Clone)]
struct UserRecord {
    preferences: BTreeMap<String, String>,
    events: Vec<MissionEvent>,
    /// Latest outcome per day and mission type, kept after the event leaves `events`
    outcomes: HashMap<(NaiveDate, MissionType), MissionResult>,
    updated_at: DateTime<Utc>,
}

impl UserRecord {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            preferences: BTreeMap::new(),
            events: Vec::new(),
            outcomes: HashMap::new(),
            updated_at: now,
        }
    }

    /// Insert or replace the event for the same day and mission type
    fn upsert_event(&mut self, event: MissionEvent) {
        self.outcomes
            .insert((event.date, event.mission_type), event.result);

        let existing = self
            .events
            .iter()
            .position(|e| e.date == event.date && e.mission_type == event.mission_type);
        match existing {
            Some(index) => self.events[index] = event,
            None => self.events.push(event),
        }
    }

    /// Success and failure totals over every outcome seen
    fn totals(&self) -> (usize, usize) {
        let success = self.outcomes.values().filter(|r| r.is_success()).count();
        (success, self.outcomes.len() - success)
    }

    fn summary(&self) -> String {
        let preferences = if self.preferences.is_empty() {
            "없음".to_owned()
        } else {
            self.preferences
                .iter()
                .map(|(k, v)| format!("{k}:{v}"))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let skip = self.events.len().saturating_sub(SUMMARY_EVENT_COUNT);
        let recent: Vec<String> = self.events.iter().skip(skip).map(MissionEvent::describe).collect();
        let recent = if recent.is_empty() {
            "없음".to_owned()
        } else {
            recent.join(" | ")
        };

        let (success, failure) = self.totals();
        format!(
            "유저 컨텍스트 요약:\n\
             - 선호/기본값: {preferences}\n\
             - 최근 기록(최대 {SUMMARY_EVENT_COUNT}건): {recent}\n\
             - 누적 통계: 성공 {success}회 / 실패 {failure}회\n\
             이 정보를 고려해 개인화된 답변을 제공하세요."
        )
    }
}

/// Concurrent per-user store
#[derive(Debug)]
pub struct PersonalizationStore {
    records: DashMap<String, UserRecord>,
    ttl: Duration,
    max_events: usize,
}

impl PersonalizationStore {
    /// Create a store with the configured TTL and event cap
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            records: DashMap::new(),
            ttl: i64::try_from(config.ttl_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
            max_events: config.max_events.max(1),
        }
    }

    /// Number of users currently remembered
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no user is remembered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn is_expired(&self, record: &UserRecord, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(record.updated_at) > self.ttl
    }

    /// Record what this request tells us about the user
    pub fn observe(&self, user_id: &str, context: &AiRequestContext) {
        self.observe_at(user_id, context, Utc::now());
    }

    /// Record what this request tells us about the user at `now`
    pub fn observe_at(&self, user_id: &str, context: &AiRequestContext, now: DateTime<Utc>) {
        if user_id.trim().is_empty() {
            return;
        }

        let mut entry = self
            .records
            .entry(user_id.to_owned())
            .or_insert_with(|| UserRecord::new(now));
        if self.is_expired(&entry, now) {
            *entry = UserRecord::new(now);
        }
        let record = entry.value_mut();

        record.preferences.extend(preferences_from(context));
        for event in events_from(context, now) {
            record.upsert_event(event);
        }
        record.events.sort_by_key(|e| e.date);
        let overflow = record.events.len().saturating_sub(self.max_events);
        record.events.drain(..overflow);
        record.updated_at = now;

        debug!(
            user_id,
            events = record.events.len(),
            preferences = record.preferences.len(),
            "Personalization record updated"
        );
    }

    /// Korean summary of the user's record, `None` when unknown or expired
    #[must_use]
    pub fn summarize(&self, user_id: &str) -> Option<String> {
        self.summarize_at(user_id, Utc::now())
    }

    /// Korean summary of the user's record as of `now`
    #[must_use]
    pub fn summarize_at(&self, user_id: &str, now: DateTime<Utc>) -> Option<String> {
        let summary = {
            let record = self.records.get(user_id)?;
            (!self.is_expired(&record, now)).then(|| record.summary())
        };
        if summary.is_none() {
            self.records.remove(user_id);
        }
        summary
    }

    /// Drop every expired record, returning how many were removed
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| !self.is_expired(record, now));
        before.saturating_sub(self.records.len())
    }
}

fn preferences_from(context: &AiRequestContext) -> Vec<(String, String)> {
    let mut preferences = Vec::new();

    if let Some(user) = &context.user_context {
        if let Some(nickname) = user.nickname.as_deref().filter(|s| !s.is_empty()) {
            preferences.push(("닉네임".to_owned(), nickname.to_owned()));
        }
        if let Some(goal) = user.app_goal.as_deref().filter(|s| !s.is_empty()) {
            preferences.push(("목표".to_owned(), goal.to_owned()));
        }
        if let Some(exercise) = user.preferred_exercise.as_deref().filter(|s| !s.is_empty()) {
            preferences.push(("선호운동".to_owned(), exercise.to_owned()));
        }
        if let Some(lifestyle) = user.lifestyle_type {
            preferences.push(("생활패턴".to_owned(), lifestyle.label_ko().to_owned()));
        }
    }

    if let Some(onboarding) = &context.onboarding {
        if let Some(goal) = onboarding.app_goal.as_deref().filter(|s| !s.is_empty()) {
            preferences.push(("목표".to_owned(), goal.to_owned()));
        }
        if let Some(work) = onboarding.work_time_type {
            preferences.push(("근무형태".to_owned(), work_time_label(work).to_owned()));
        }
        if let Some(minutes) = onboarding.min_exercise_minutes {
            preferences.push(("최소운동시간".to_owned(), format!("{minutes}분")));
        }
        if !onboarding.preferred_exercises.is_empty() {
            preferences.push((
                "선호운동".to_owned(),
                onboarding.preferred_exercises.join("/"),
            ));
        }
        if let Some(lifestyle) = onboarding.lifestyle_type {
            preferences.push(("생활패턴".to_owned(), lifestyle.label_ko().to_owned()));
        }
    }

    preferences
}

fn events_from(context: &AiRequestContext, now: DateTime<Utc>) -> Vec<MissionEvent> {
    let mut events: Vec<MissionEvent> = context
        .recent_mission_history
        .iter()
        .map(|entry| MissionEvent {
            date: entry.date,
            mission_type: entry.mission_type,
            mission: None,
            result: entry.result,
            failure_reason: entry.failure_reason.clone(),
        })
        .collect();

    if let Some(today) = &context.today_mission {
        if let (Some(mission_type), Some(result)) = (today.mission_type, today.result) {
            events.push(MissionEvent {
                date: context.target_date.unwrap_or_else(|| now.date_naive()),
                mission_type,
                mission: today.name.clone(),
                result,
                failure_reason: today.failure_reason.clone(),
            });
        }
    }

    events
}

const fn mission_type_label(mission_type: MissionType) -> &'static str {
    match mission_type {
        MissionType::Exercise => "운동",
        MissionType::Diet => "식단",
    }
}

const fn result_label(result: MissionResult) -> &'static str {
    match result {
        MissionResult::Success => "성공",
        MissionResult::Failure => "실패",
    }
}

const fn work_time_label(work: WorkTimeType) -> &'static str {
    match work {
        WorkTimeType::Fixed => "고정 근무",
        WorkTimeType::Shift => "교대 근무",
        WorkTimeType::Flexible => "유연 근무",
        WorkTimeType::Other => "기타",
    }
}
