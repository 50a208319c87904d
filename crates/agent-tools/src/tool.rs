//! Tool trait definition

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{Result, ToolDescriptor, ToolError};

/// Trait for tools that agents can execute
///
/// Implementors provide a [`ToolDescriptor`] and [`Tool::execute`]; callers
/// go through [`Tool::invoke`], which validates arguments before anything
/// runs and checks the result against the declared return type.
///
/// Tools do not retry. Side effects must be safe for the caller to repeat.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's descriptor
    fn descriptor(&self) -> &ToolDescriptor;

    /// Run the tool with already-validated arguments
    async fn execute(&self, args: Map<String, Value>) -> Result<Value>;

    /// Validate `args`, execute, and check the result type
    async fn invoke(&self, args: Value) -> Result<Value> {
        let descriptor = self.descriptor();
        let args = descriptor.validate(args)?;
        debug!(tool = %descriptor.name, "invoking tool");

        let result = self.execute(args).await?;
        if !descriptor.returns.matches(&result) {
            return Err(ToolError::execution(
                &descriptor.name,
                format!("returned a value that is not {:?}", descriptor.returns),
            ));
        }
        Ok(result)
    }

    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry
    fn name(&self) -> &str {
        &self.descriptor().name
    }

    /// Get the tool's description
    ///
    /// This description helps the router and the model decide when to use
    /// this tool
    fn description(&self) -> &str {
        &self.descriptor().description
    }
}

/// Render a tool result as text for a conversational reply
///
/// Strings are passed through; anything else is pretty-printed JSON.
pub fn render_output(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
