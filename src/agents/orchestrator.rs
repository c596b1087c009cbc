// ABOUTME: Intent orchestrator resolving each request to exactly one AI feature
// ABOUTME: Deterministic rule table with keyword matching and an optional LLM classifier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

//! # Orchestrator
//!
//! Rules are evaluated top to bottom and the first match wins:
//!
//! 1. explicit `intent` field
//! 2. weekly context fields
//! 3. daily feedback context fields
//! 4. onboarding answers
//! 5. ongoing conversation (history present, or an option selection)
//! 6. keywords in the user's typed text
//! 7. LLM classifier, when enabled
//! 8. `CHAT`
//!
//! Option values are machine tokens and never go through keyword matching.

use std::fmt::{self, Display, Formatter};
use tracing::{info, instrument, warn};

use super::{AgentRole, AgentRuntime};
use crate::config::IntentClassifierMode;
use crate::llm::prompts::{orchestrator_user_prompt, ORCHESTRATOR_SYSTEM_PROMPT};
use crate::llm::ChatMessage;
use omteam_core::models::{AiChatRequest, AiIntent, AiRequestContext};

const WEEKLY_KEYWORDS: &[&str] = &[
    "주간",
    "이번 주",
    "이번주",
    "일주일",
    "한 주",
    "weekly",
    "this week",
];

const FEEDBACK_KEYWORDS: &[&str] = &[
    "피드백",
    "오늘 미션",
    "오늘 결과",
    "오늘 어땠",
    "평가",
    "feedback",
    "how did i do",
];

const MISSION_KEYWORDS: &[&str] = &[
    "미션 추천",
    "미션",
    "추천",
    "mission",
    "recommend",
];

const PLANNER_FALLBACK_KEYWORDS: &[&str] = &["계획", "전략", "로드맵", "plan", "strategy"];
const COACH_FALLBACK_KEYWORDS: &[&str] = &["코칭", "가이드", "조언", "coach", "guide", "advice"];

/// Which rule produced the intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionRule {
    /// The request named its intent
    ExplicitIntent,
    /// Weekly context fields were present
    WeeklyContext,
    /// Daily feedback context fields were present
    DailyFeedbackContext,
    /// Onboarding answers were present
    OnboardingContext,
    /// The turn continues a conversation
    Conversation,
    /// A keyword matched the user's text
    Keyword,
    /// The LLM classifier picked an agent
    LlmClassifier,
    /// Nothing matched
    Fallback,
}

impl ResolutionRule {
    /// Log label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExplicitIntent => "explicit_intent",
            Self::WeeklyContext => "weekly_context",
            Self::DailyFeedbackContext => "daily_feedback_context",
            Self::OnboardingContext => "onboarding_context",
            Self::Conversation => "conversation",
            Self::Keyword => "keyword",
            Self::LlmClassifier => "llm_classifier",
            Self::Fallback => "fallback",
        }
    }
}

impl Display for ResolutionRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of intent resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentResolution {
    /// Feature to run
    pub intent: AiIntent,
    /// Rule that fired
    pub rule: ResolutionRule,
}

impl IntentResolution {
    const fn new(intent: AiIntent, rule: ResolutionRule) -> Self {
        Self { intent, rule }
    }

    /// Agent serving the resolved intent
    #[must_use]
    pub const fn agent(&self) -> AgentRole {
        match self.intent {
            AiIntent::DailyMission => AgentRole::Planner,
            AiIntent::DailyFeedback | AiIntent::WeeklyAnalysis => AgentRole::Analyst,
            AiIntent::Chat => AgentRole::Coach,
        }
    }
}

/// Map a classifier answer to an agent, falling back to request keywords
///
/// Unrecognized answers fall through the planner and coach keyword lists
/// and end at the analyst.
#[must_use]
pub fn normalize_agent_choice(raw: &str, fallback_request: &str) -> AgentRole {
    let answer = raw.trim().to_lowercase();
    if answer.contains("planner") {
        return AgentRole::Planner;
    }
    if answer.contains("coach") {
        return AgentRole::Coach;
    }
    if answer.contains("analysis") {
        return AgentRole::Analyst;
    }

    let request = fallback_request.to_lowercase();
    if contains_any(&request, PLANNER_FALLBACK_KEYWORDS) {
        AgentRole::Planner
    } else if contains_any(&request, COACH_FALLBACK_KEYWORDS) {
        AgentRole::Coach
    } else {
        AgentRole::Analyst
    }
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack.contains(keyword))
}

/// Keyword rule over the user's text
#[must_use]
pub fn match_keywords(text: &str) -> Option<AiIntent> {
    let lowered = text.to_lowercase();
    if contains_any(&lowered, WEEKLY_KEYWORDS) {
        Some(AiIntent::WeeklyAnalysis)
    } else if contains_any(&lowered, FEEDBACK_KEYWORDS) {
        Some(AiIntent::DailyFeedback)
    } else if contains_any(&lowered, MISSION_KEYWORDS) {
        Some(AiIntent::DailyMission)
    } else {
        None
    }
}

/// Intent router
#[derive(Debug, Clone, Copy, Default)]
pub struct Orchestrator {
    classifier: IntentClassifierMode,
}

impl Orchestrator {
    /// Create an orchestrator with the given fallback classifier
    #[must_use]
    pub const fn new(classifier: IntentClassifierMode) -> Self {
        Self { classifier }
    }

    /// Apply rules 1 to 6
    #[must_use]
    pub fn resolve_by_rules(
        request: &AiChatRequest,
        context: &AiRequestContext,
    ) -> Option<IntentResolution> {
        let signalled = context.signalled_intents();

        if let Some(intent) = request.intent {
            if signalled.iter().any(|s| *s != intent) {
                warn!(
                    intent = %intent,
                    signalled = ?signalled,
                    "Explicit intent overrides conflicting context fields"
                );
            }
            return Some(IntentResolution::new(intent, ResolutionRule::ExplicitIntent));
        }

        if signalled.len() > 1 {
            warn!(
                signalled = ?signalled,
                chosen = %signalled[0],
                "Context carries fields for several intents; first rule wins"
            );
        }

        if let Some(first) = signalled.first() {
            let rule = match first {
                AiIntent::WeeklyAnalysis => ResolutionRule::WeeklyContext,
                AiIntent::DailyFeedback => ResolutionRule::DailyFeedbackContext,
                AiIntent::DailyMission | AiIntent::Chat => ResolutionRule::OnboardingContext,
            };
            return Some(IntentResolution::new(*first, rule));
        }

        if request.input.is_selection() || !context.conversation_history.is_empty() {
            return Some(IntentResolution::new(
                AiIntent::Chat,
                ResolutionRule::Conversation,
            ));
        }

        request
            .input
            .trimmed_text()
            .and_then(match_keywords)
            .map(|intent| IntentResolution::new(intent, ResolutionRule::Keyword))
    }

    /// Resolve the request to one intent
    #[instrument(skip_all, fields(classifier = %self.classifier))]
    pub async fn resolve(
        &self,
        runtime: &AgentRuntime,
        request: &AiChatRequest,
        context: &AiRequestContext,
        personalization: Option<&str>,
    ) -> IntentResolution {
        let resolution = match Self::resolve_by_rules(request, context) {
            Some(resolution) => resolution,
            None => match (self.classifier, request.input.display_text()) {
                (IntentClassifierMode::Llm, Some(text)) => {
                    Self::classify_with_llm(runtime, text, personalization).await
                }
                _ => IntentResolution::new(AiIntent::Chat, ResolutionRule::Fallback),
            },
        };

        info!(
            intent = %resolution.intent,
            rule = %resolution.rule,
            agent = %resolution.agent(),
            "Intent resolved"
        );
        resolution
    }

    async fn classify_with_llm(
        runtime: &AgentRuntime,
        text: &str,
        personalization: Option<&str>,
    ) -> IntentResolution {
        let mut messages = vec![ChatMessage::system(ORCHESTRATOR_SYSTEM_PROMPT)];
        if let Some(summary) = personalization.filter(|s| !s.is_empty()) {
            messages.push(ChatMessage::system(summary));
        }
        messages.push(ChatMessage::user(orchestrator_user_prompt(text)));

        match runtime.invoke_text(messages, false).await {
            Ok(answer) => {
                let intent = match normalize_agent_choice(&answer, text) {
                    AgentRole::Planner => AiIntent::DailyMission,
                    AgentRole::Analyst => AiIntent::DailyFeedback,
                    AgentRole::Coach => AiIntent::Chat,
                };
                IntentResolution::new(intent, ResolutionRule::LlmClassifier)
            }
            Err(e) => {
                warn!("Intent classifier failed, falling back to chat: {e}");
                IntentResolution::new(AiIntent::Chat, ResolutionRule::Fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_agent_choice_labels() {
        assert_eq!(normalize_agent_choice(" \"Planner\" ", ""), AgentRole::Planner);
        assert_eq!(normalize_agent_choice("coach", ""), AgentRole::Coach);
        assert_eq!(normalize_agent_choice("analysis", ""), AgentRole::Analyst);
    }

    #[test]
    fn test_normalize_agent_choice_heuristics() {
        assert_eq!(
            normalize_agent_choice("", "6개월 로드맵이 필요해"),
            AgentRole::Planner
        );
        assert_eq!(
            normalize_agent_choice("???", "조언 좀 해줘"),
            AgentRole::Coach
        );
        assert_eq!(normalize_agent_choice("", "안녕"), AgentRole::Analyst);
    }

    #[test]
    fn test_keyword_priority() {
        assert_eq!(
            match_keywords("이번 주 미션 결과 분석해줘"),
            Some(AiIntent::WeeklyAnalysis)
        );
        assert_eq!(
            match_keywords("오늘 미션 피드백 줘"),
            Some(AiIntent::DailyFeedback)
        );
        assert_eq!(
            match_keywords("Recommend a mission"),
            Some(AiIntent::DailyMission)
        );
        assert_eq!(match_keywords("운동이 너무 힘들어요"), None);
    }
}
