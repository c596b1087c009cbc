// ABOUTME: Chat input, conversation history and chatbot reply models
// ABOUTME: Covers both the caller's turn and the coach agent's structured answer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Omteam

use serde::{Deserialize, Serialize};

/// Kind of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChatInputType {
    /// Free text typed by the user
    #[default]
    #[serde(rename = "TEXT")]
    Text,
    /// A selectable option offered by the bot
    #[serde(rename = "OPTION")]
    Selection,
}

/// The user's current turn
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatInput {
    /// Input kind
    #[serde(rename = "type")]
    pub input_type: ChatInputType,
    /// Text typed, or the label of the selected option
    #[serde(default)]
    pub text: Option<String>,
    /// Value of the selected option
    #[serde(default)]
    pub value: Option<String>,
}

impl ChatInput {
    /// Free-text input
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            input_type: ChatInputType::Text,
            text: Some(text.into()),
            value: None,
        }
    }

    /// Option selection
    #[must_use]
    pub fn selection(label: Option<String>, value: impl Into<String>) -> Self {
        Self {
            input_type: ChatInputType::Selection,
            text: label,
            value: Some(value.into()),
        }
    }

    /// Text with surrounding whitespace removed, `None` when blank
    #[must_use]
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Value with surrounding whitespace removed, `None` when blank
    #[must_use]
    pub fn trimmed_value(&self) -> Option<&str> {
        self.value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// The user picked one of the bot's options
    #[must_use]
    pub fn is_selection(&self) -> bool {
        self.input_type == ChatInputType::Selection
    }

    /// Best human-readable rendering of the turn for prompts
    #[must_use]
    pub fn display_text(&self) -> Option<&str> {
        match self.input_type {
            ChatInputType::Text => self.trimmed_text(),
            ChatInputType::Selection => self.trimmed_text().or_else(|| self.trimmed_value()),
        }
    }
}

/// Speaker of a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationRole {
    /// The app user
    User,
    /// The chatbot
    #[serde(alias = "bot", alias = "ai")]
    Assistant,
}

/// A selectable answer offered by the bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotMessageOption {
    /// Text shown on the button
    pub label: String,
    /// Value sent back when selected
    pub value: String,
}

/// One earlier turn of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistoryEntry {
    /// Speaker
    pub role: ConversationRole,
    /// Input kind of the turn
    #[serde(rename = "type", default)]
    pub input_type: ChatInputType,
    /// Turn text
    #[serde(default)]
    pub text: String,
    /// Options offered on a bot turn
    #[serde(default)]
    pub options: Vec<BotMessageOption>,
}

/// The bot's reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotMessage {
    /// Server-assigned identifier
    pub message_id: String,
    /// Reply text
    pub text: String,
    /// Selectable follow-ups, possibly empty
    #[serde(default)]
    pub options: Vec<BotMessageOption>,
}

/// Conversation state after the reply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatState {
    /// Whether the conversation reached a natural end
    #[serde(default)]
    pub is_terminal: bool,
}

/// Payload of the `chat` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    /// The bot's message
    pub bot_message: BotMessage,
    /// Conversation state
    #[serde(default)]
    pub state: ChatState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_input_wire_name() {
        let input: ChatInput =
            serde_json::from_str(r#"{"type":"OPTION","value":"TIRED"}"#).unwrap();
        assert_eq!(input.input_type, ChatInputType::Selection);
        assert_eq!(input.display_text(), Some("TIRED"));
    }

    #[test]
    fn test_blank_text_has_no_display_text() {
        let input = ChatInput::text("   ");
        assert!(input.display_text().is_none());
    }

    #[test]
    fn test_bot_role_alias() {
        let entry: ConversationHistoryEntry =
            serde_json::from_str(r#"{"role":"bot","type":"TEXT","text":"안녕하세요"}"#).unwrap();
        assert_eq!(entry.role, ConversationRole::Assistant);
        assert!(entry.options.is_empty());
    }
}
