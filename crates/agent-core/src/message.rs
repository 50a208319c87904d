//! Conversation messages exchanged between users and agents
//!
//! A [`Message`] is immutable once built: the constructors and the
//! builder-style [`Message::with_part`] are the only ways to shape one.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End user, or a coordinator speaking on the user's behalf
    User,
    /// Any agent reply
    Agent,
}

/// One piece of message content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text
    Text {
        /// Text content
        text: String,
    },
    /// Key-value payload
    #[serde(rename = "data")]
    Structured {
        /// Structured content
        data: Map<String, Value>,
    },
}

impl ContentPart {
    /// Text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Structured part
    pub fn structured(data: Map<String, Value>) -> Self {
        Self::Structured { data }
    }

    /// Text content, if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Structured { .. } => None,
        }
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Ordered content parts
    pub parts: Vec<ContentPart>,
}

impl Message {
    /// Create a message from parts
    pub fn new(role: Role, parts: Vec<ContentPart>) -> Self {
        Self { role, parts }
    }

    /// Create a user message with text
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![ContentPart::text(text)])
    }

    /// Create an agent message with text
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Role::Agent, vec![ContentPart::text(text)])
    }

    /// Return a copy with one more part appended
    pub fn with_part(mut self, part: ContentPart) -> Self {
        self.parts.push(part);
        self
    }

    /// All text parts joined by newlines
    ///
    /// Structured parts are rendered as compact JSON so that a chained
    /// agent still sees them.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                ContentPart::Text { text } => text.clone(),
                ContentPart::Structured { data } => Value::Object(data.clone()).to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether the message carries no content
    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|part| match part {
            ContentPart::Text { text } => text.trim().is_empty(),
            ContentPart::Structured { data } => data.is_empty(),
        })
    }
}
