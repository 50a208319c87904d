//! Model-side conversation messages
//!
//! These are distinct from [`agent_core::Message`]: they carry tool calls
//! and tool results, which never leave an agent's own loop.

use agent_core::{ContentPart, Message, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Speaker of a model-side message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Conversation partner (user or a delegating coordinator)
    User,
    /// The model
    Assistant,
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call id, echoed back in the result
    pub id: String,
    /// Requested tool name
    pub name: String,
    /// Raw arguments
    pub input: Value,
}

/// One block of model-side content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text
    Text { text: String },
    /// Tool call requested by the model
    ToolCall(ToolCall),
    /// Result of a tool call, sent back to the model
    ToolResult {
        tool_use_id: String,
        content: String,
        is_error: bool,
    },
}

/// A message in a model conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Speaker
    pub role: ChatRole,
    /// Ordered content blocks
    pub blocks: Vec<ContentBlock>,
}

impl ChatMessage {
    /// User message with text
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            blocks: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// Assistant message with text
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            blocks: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// Tool result returned to the model
    pub fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            blocks: vec![ContentBlock::ToolResult {
                tool_use_id: tool_use_id.into(),
                content: content.into(),
                is_error: false,
            }],
        }
    }

    /// Failed tool result returned to the model
    pub fn tool_error(tool_use_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            blocks: vec![ContentBlock::ToolResult {
                tool_use_id: tool_use_id.into(),
                content: error.into(),
                is_error: true,
            }],
        }
    }

    /// Text blocks joined by newlines
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Tool calls requested in this message
    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolCall(call) => Some(call),
                _ => None,
            })
            .collect()
    }
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        let role = match message.role {
            Role::User => ChatRole::User,
            Role::Agent => ChatRole::Assistant,
        };
        let blocks = message
            .parts
            .iter()
            .map(|part| match part {
                ContentPart::Text { text } => ContentBlock::Text { text: text.clone() },
                ContentPart::Structured { data } => ContentBlock::Text {
                    text: Value::Object(data.clone()).to_string(),
                },
            })
            .collect();
        Self { role, blocks }
    }
}
