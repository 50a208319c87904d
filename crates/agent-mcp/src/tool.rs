//! MCPTool wrapper that implements the Tool trait

use agent_tools::{Tool, ToolDescriptor, ToolError, ValueType};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

use crate::client::{MCPClient, MCPToolDefinition, MCPToolResult};
use crate::Result;

/// A tool served by a remote MCP server
///
/// The descriptor is rebuilt from the published JSON Schema, so arguments
/// are validated locally before anything goes over the wire.
pub struct MCPTool {
    descriptor: ToolDescriptor,
    client: Arc<dyn MCPClient>,
}

impl MCPTool {
    /// Wrap one remote tool definition
    pub fn new(definition: &MCPToolDefinition, client: Arc<dyn MCPClient>) -> Self {
        let descriptor = ToolDescriptor::from_input_schema(
            &definition.name,
            definition
                .description
                .as_deref()
                .unwrap_or("No description available"),
            &definition.input_schema,
        )
        .returns(ValueType::Any);
        Self { descriptor, client }
    }

    /// Wrap every tool the server lists
    ///
    /// With `only`, tools whose names are not listed are skipped.
    pub async fn discover_all(
        client: Arc<dyn MCPClient>,
        only: Option<&[&str]>,
    ) -> Result<Vec<Arc<dyn Tool>>> {
        let definitions = client.list_tools().await?;
        debug!("Found {} tools on MCP server", definitions.len());

        let tools: Vec<Arc<dyn Tool>> = definitions
            .iter()
            .filter(|d| only.is_none_or(|names| names.contains(&d.name.as_str())))
            .map(|d| Arc::new(Self::new(d, Arc::clone(&client))) as Arc<dyn Tool>)
            .collect();

        info!("Wrapped {} MCP tools", tools.len());
        Ok(tools)
    }

    /// Read the tool's output back from text content
    ///
    /// Servers put the JSON output in a text block; text that is not JSON
    /// is passed through as a string.
    fn convert_result(result: &MCPToolResult) -> Value {
        let text = result.joined_text();
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    }
}

#[async_trait]
impl Tool for MCPTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, args: Map<String, Value>) -> agent_tools::Result<Value> {
        let name = &self.descriptor.name;
        let result = self
            .client
            .call_tool(name, Value::Object(args))
            .await
            .map_err(|e| ToolError::execution(name, e.to_string()))?;

        if result.is_error {
            return Err(ToolError::execution(name, result.joined_text()));
        }

        Ok(Self::convert_result(&result))
    }
}
