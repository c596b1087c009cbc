// ABOUTME: Coach agent continuing the chatbot conversation
// ABOUTME: Replays conversation history as chat turns and assigns server-side message ids
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{data_line, user_turn, AgentInput, AgentRole, AgentRuntime};
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::CHAT_CONTRACT;
use crate::llm::ChatMessage;
use omteam_core::constants::input::MAX_CONVERSATION_HISTORY;
use omteam_core::models::{
    BotMessage, BotMessageOption, ChatInputType, ChatReply, ChatState, ConversationHistoryEntry,
    ConversationRole,
};

#[derive(Debug, Default, Deserialize)]
struct RawBotMessage {
    #[serde(default)]
    text: String,
    #[serde(default)]
    options: Vec<BotMessageOption>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChatReply {
    #[serde(default)]
    bot_message: RawBotMessage,
    #[serde(default)]
    state: ChatState,
}

/// Render one history entry as a chat turn
fn history_turn(entry: &ConversationHistoryEntry) -> ChatMessage {
    match entry.role {
        ConversationRole::User => ChatMessage::user(entry.text.clone()),
        ConversationRole::Assistant if entry.options.is_empty() => {
            ChatMessage::assistant(entry.text.clone())
        }
        ConversationRole::Assistant => {
            let options = entry
                .options
                .iter()
                .map(|o| format!("{}({})", o.label, o.value))
                .collect::<Vec<_>>()
                .join(", ");
            ChatMessage::assistant(format!("{}\n선택지: {options}", entry.text))
        }
    }
}

/// Describe the user's current turn
fn describe_input(input: &AgentInput<'_>) -> String {
    let chat_input = &input.request.input;
    match chat_input.input_type {
        ChatInputType::Text => chat_input.trimmed_text().unwrap_or_default().to_owned(),
        ChatInputType::Selection => match (chat_input.trimmed_text(), chat_input.trimmed_value()) {
            (Some(label), Some(value)) => format!("선택: {label} ({value})"),
            (Some(label), None) => format!("선택: {label}"),
            (None, Some(value)) => format!("선택: {value}"),
            (None, None) => "없음 (대화 시작)".to_owned(),
        },
    }
}

/// Build the coach prompt
#[must_use]
pub fn build_messages(input: &AgentInput<'_>) -> Vec<ChatMessage> {
    let context = input.context;
    let mut messages = input.system_messages(AgentRole::Coach);

    let history = &context.conversation_history;
    let skip = history.len().saturating_sub(MAX_CONVERSATION_HISTORY);
    messages.extend(
        history
            .iter()
            .skip(skip)
            .filter(|entry| !entry.text.trim().is_empty())
            .map(history_turn),
    );

    let mut lines = Vec::new();
    if context.user_context.is_some() {
        lines.push(data_line("사용자 컨텍스트", &context.user_context));
    }
    lines.push(format!("사용자 마지막 입력: {}", describe_input(input)));
    lines.push(format!(
        "요청 시각: {}",
        input.request.timestamp.to_rfc3339()
    ));

    messages.push(user_turn(&lines, CHAT_CONTRACT));
    messages
}

fn finalize(raw: RawChatReply) -> AppResult<ChatReply> {
    let text = raw.bot_message.text.trim().to_owned();
    if text.is_empty() {
        return Err(AppError::external_response_invalid(
            AgentRole::Coach.label(),
            "botMessage.text was empty",
        ));
    }

    let options = raw
        .bot_message
        .options
        .into_iter()
        .filter(|o| !o.label.trim().is_empty())
        .collect();

    Ok(ChatReply {
        bot_message: BotMessage {
            message_id: format!("msg_{}", Uuid::new_v4().simple()),
            text,
            options,
        },
        state: raw.state,
    })
}

/// Produce the next chatbot turn
///
/// # Errors
///
/// Propagates provider failures and invalid model output
#[instrument(skip_all, fields(agent = "coach", history = input.context.conversation_history.len()))]
pub async fn reply(runtime: &AgentRuntime, input: &AgentInput<'_>) -> AppResult<ChatReply> {
    let raw: RawChatReply = runtime
        .invoke_structured(AgentRole::Coach, build_messages(input))
        .await?;
    let reply = finalize(raw)?;
    info!(
        message_id = %reply.bot_message.message_id,
        options = reply.bot_message.options.len(),
        is_terminal = reply.state.is_terminal,
        "Chat reply generated"
    );
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::llm::MessageRole;
    use chrono::Utc;
    use omteam_core::models::{AiChatRequest, AiRequestContext, ChatInput};

    fn history_entry(role: ConversationRole, text: &str) -> ConversationHistoryEntry {
        ConversationHistoryEntry {
            role,
            input_type: ChatInputType::Text,
            text: text.to_owned(),
            options: Vec::new(),
        }
    }

    #[test]
    fn test_history_is_replayed_in_order() {
        let request = AiChatRequest {
            user_id: None,
            session_id: None,
            input: ChatInput::selection(Some("가볍게".to_owned()), "LIGHT"),
            context: None,
            timestamp: Utc::now(),
            intent: None,
        };
        let context = AiRequestContext {
            conversation_history: vec![
                history_entry(ConversationRole::User, "운동이 힘들어요"),
                history_entry(ConversationRole::Assistant, "어떤 강도가 좋을까요?"),
            ],
            ..AiRequestContext::default()
        };
        let input = AgentInput::new(&request, &context, None);

        let messages = build_messages(&input);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[2].role, MessageRole::Assistant);
        assert!(messages[3].content.contains("선택: 가볍게 (LIGHT)"));
    }

    #[test]
    fn test_finalize_assigns_message_id() {
        let raw: RawChatReply = serde_json::from_str(
            r#"{"botMessage":{"text":" 오늘은 쉬어가도 괜찮아요 ","options":[{"label":"좋아요","value":"OK"}]},
                "state":{"isTerminal":true}}"#,
        )
        .unwrap();

        let reply = finalize(raw).unwrap();
        assert!(reply.bot_message.message_id.starts_with("msg_"));
        assert_eq!(reply.bot_message.text, "오늘은 쉬어가도 괜찮아요");
        assert!(reply.state.is_terminal);
    }

    #[test]
    fn test_blank_text_is_rejected() {
        let raw: RawChatReply = serde_json::from_str(r#"{"botMessage":{"text":""}}"#).unwrap();
        let err = finalize(raw).unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalResponseInvalid);
    }
}
