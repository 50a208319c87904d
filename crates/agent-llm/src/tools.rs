//! Tool definitions offered to the model

use agent_tools::ToolDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool the model may call, with its JSON Schema input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (matches the agent's declared tool)
    pub name: String,
    /// What the tool does
    pub description: String,
    /// JSON Schema of the arguments object
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Create a tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

impl From<&ToolDescriptor> for ToolDefinition {
    fn from(descriptor: &ToolDescriptor) -> Self {
        Self::new(
            descriptor.name.clone(),
            descriptor.description.clone(),
            descriptor.input_schema(),
        )
    }
}
