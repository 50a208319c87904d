//! Agent capability descriptors

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Content type an agent accepts or produces (e.g. "text", "text/plain")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentType(String);

impl ContentType {
    /// Free-form text
    pub const TEXT: &'static str = "text";
    /// MIME plain text
    pub const TEXT_PLAIN: &'static str = "text/plain";
    /// JSON payloads
    pub const JSON: &'static str = "application/json";

    /// Create a content type
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Plain "text" content type
    pub fn text() -> Self {
        Self::new(Self::TEXT)
    }

    /// The raw content type string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Describes an agent to whoever routes requests to it
///
/// `description` and `capability_tags` drive routing decisions; the name
/// must be unique within one coordinator's registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    /// Unique agent name
    pub name: String,
    /// What the agent does
    pub description: String,
    /// Short capability phrases ("sentiment analysis")
    pub capability_tags: BTreeSet<String>,
    /// Accepted input content types
    pub input_modes: BTreeSet<ContentType>,
    /// Produced output content types
    pub output_modes: BTreeSet<ContentType>,
}

impl AgentDescriptor {
    /// Create a text-in/text-out descriptor with no tags
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            capability_tags: BTreeSet::new(),
            input_modes: BTreeSet::from([ContentType::text()]),
            output_modes: BTreeSet::from([ContentType::text()]),
        }
    }

    /// Add a capability tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.capability_tags.insert(tag.into());
        self
    }

    /// Add several capability tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capability_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Replace the input modes
    pub fn with_input_modes<I: IntoIterator<Item = ContentType>>(mut self, modes: I) -> Self {
        self.input_modes = modes.into_iter().collect();
        self
    }

    /// Replace the output modes
    pub fn with_output_modes<I: IntoIterator<Item = ContentType>>(mut self, modes: I) -> Self {
        self.output_modes = modes.into_iter().collect();
        self
    }
}
