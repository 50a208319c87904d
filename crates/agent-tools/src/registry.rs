//! Tool registry for managing available tools

use crate::Tool;
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered set of uniquely named tools
///
/// A registry is assembled once and then shared read-only; iteration
/// follows registration order.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    ///
    /// # Errors
    ///
    /// Returns an error if a tool with the same name is already registered
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> agent_core::Result<()> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(agent_core::Error::InitializationFailed(format!(
                "Tool '{name}' is already registered"
            )));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| self.tools[i].clone())
    }

    /// Whether a tool with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// List all registered tools in registration order
    pub fn list_tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Registered tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Result, ToolDescriptor};
    use async_trait::async_trait;
    use serde_json::{Map, Value, json};

    struct Named(ToolDescriptor);

    #[async_trait]
    impl Tool for Named {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.0
        }

        async fn execute(&self, _args: Map<String, Value>) -> Result<Value> {
            Ok(json!({}))
        }
    }

    fn tool(name: &str) -> Arc<dyn Tool> {
        Arc::new(Named(ToolDescriptor::new(name, "test tool")))
    }

    #[test]
    fn test_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("b")).unwrap();
        registry.register(tool("a")).unwrap();
        registry.register(tool("c")).unwrap();

        assert_eq!(registry.names(), vec!["b", "a", "c"]);
        assert!(registry.get("a").is_some());
        assert!(registry.get("z").is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(tool("get_news")).unwrap();
        assert!(registry.register(tool("get_news")).is_err());
        assert_eq!(registry.len(), 1);
    }
}
