//! MCP client implementations

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

pub mod http;

/// MCP client trait
///
/// All methods take `&self` so a client can be shared through `Arc`;
/// implementations use interior mutability for connection state.
#[async_trait]
pub trait MCPClient: Send + Sync {
    /// Initialize connection to MCP server
    async fn connect(&self) -> Result<()>;

    /// Check if client is connected
    fn is_connected(&self) -> bool;

    /// List available tools
    async fn list_tools(&self) -> Result<Vec<MCPToolDefinition>>;

    /// Call a tool
    async fn call_tool(&self, name: &str, arguments: Value) -> Result<MCPToolResult>;

    /// Get server info (from initialize response)
    async fn server_info(&self) -> Option<MCPServerInfo>;
}

/// MCP tool definition (from tools/list)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MCPToolDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value, // JSON Schema
}

/// MCP tool result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MCPToolResult {
    pub content: Vec<MCPContent>,
    #[serde(default, rename = "isError")]
    pub is_error: bool,
}

impl MCPToolResult {
    /// Successful result carrying one text block
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![MCPContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Failed result carrying the error description
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::text(text)
        }
    }

    /// All text blocks joined by newlines
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|block| match block {
                MCPContent::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// MCP content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MCPContent {
    Text { text: String },
}

/// MCP server info (from initialize)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MCPServerInfo {
    pub name: String,
    pub version: String,
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
}
