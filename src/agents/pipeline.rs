// ABOUTME: End-to-end AI request pipeline from validated request to agent payload
// ABOUTME: Validates, personalizes, resolves intent, dispatches one agent under a timeout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, instrument};

use super::{analyst, coach, planner, AgentInput, AgentRuntime, IntentResolution, Orchestrator};
use crate::errors::{AppError, AppResult};
use crate::personalization::PersonalizationStore;
use omteam_core::models::{AiChatRequest, AiIntent, AiPayload};

/// Runs one request through orchestrator, agent and assembler input
pub struct AiPipeline {
    runtime: AgentRuntime,
    orchestrator: Orchestrator,
    personalization: Option<Arc<PersonalizationStore>>,
    deadline: Duration,
}

impl AiPipeline {
    /// Create a pipeline
    #[must_use]
    pub const fn new(
        runtime: AgentRuntime,
        orchestrator: Orchestrator,
        personalization: Option<Arc<PersonalizationStore>>,
        deadline: Duration,
    ) -> Self {
        Self {
            runtime,
            orchestrator,
            personalization,
            deadline,
        }
    }

    /// Personalization store, when enabled
    #[must_use]
    pub const fn personalization(&self) -> Option<&Arc<PersonalizationStore>> {
        self.personalization.as_ref()
    }

    /// Handle one request
    ///
    /// `forced_intent` overrides the request's own `intent`, which is how
    /// the per-feature endpoints reuse the unified flow.
    ///
    /// # Errors
    ///
    /// Returns validation errors, provider errors, invalid model output, or
    /// `Timeout` when the deadline passes
    #[instrument(
        skip(self, request),
        fields(
            user_id = request.user_id.as_ref().map(|id| id.as_str()),
            forced_intent = forced_intent.map(|i| i.as_str()),
        )
    )]
    pub async fn handle(
        &self,
        mut request: AiChatRequest,
        forced_intent: Option<AiIntent>,
    ) -> AppResult<AiPayload> {
        request.validate()?;
        if forced_intent.is_some() {
            request.intent = forced_intent;
        }

        timeout(self.deadline, self.run(&request))
            .await
            .map_err(|_| {
                AppError::timeout(format!(
                    "AI response was not ready within {}s",
                    self.deadline.as_secs()
                ))
            })?
    }

    async fn run(&self, request: &AiChatRequest) -> AppResult<AiPayload> {
        let context = request.context_or_default();

        let personalization = self.personalization.as_ref().and_then(|store| {
            let user_id = request.user_id.as_ref()?;
            store.observe(user_id.as_str(), &context);
            store.summarize(user_id.as_str())
        });
        if personalization.is_some() {
            debug!("Personalization summary attached");
        }

        let resolution = self
            .orchestrator
            .resolve(&self.runtime, request, &context, personalization.as_deref())
            .await;

        let input = AgentInput::new(request, &context, personalization.as_deref());
        let payload = self.dispatch(resolution, &input).await?;

        info!(intent = %payload.intent(), "AI payload ready");
        Ok(payload)
    }

    async fn dispatch(
        &self,
        resolution: IntentResolution,
        input: &AgentInput<'_>,
    ) -> AppResult<AiPayload> {
        let runtime = &self.runtime;
        Ok(match resolution.intent {
            AiIntent::DailyMission => {
                AiPayload::DailyMission(planner::recommend_missions(runtime, input).await?)
            }
            AiIntent::DailyFeedback => {
                AiPayload::DailyFeedback(analyst::daily_feedback(runtime, input).await?)
            }
            AiIntent::WeeklyAnalysis => {
                AiPayload::WeeklyAnalysis(analyst::weekly_analysis(runtime, input).await?)
            }
            AiIntent::Chat => AiPayload::Chat(coach::reply(runtime, input).await?),
        })
    }
}
