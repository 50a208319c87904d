//! Agent executor for running the model/tool loop
//!
//! The AgentExecutor implements the loop a local agent uses to resolve a
//! turn:
//! 1. Call the model with the instruction, prior conversation and tools
//! 2. If the model asks for tools, check every call against the declared
//!    tool set, execute them and feed the results back
//! 3. Otherwise return the model's text

use agent_core::{Error, Message, Result};
use agent_llm::{
    ChatMessage, CompletionRequest, LLMProvider, StopReason, ToolCall, ToolDefinition,
};
use agent_tools::ToolRegistry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of model calls per turn
    pub max_iterations: usize,

    /// Model to use
    pub model: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            model: "gemini-2.0-flash".to_string(),
            max_tokens: 4096,
            temperature: Some(0.2),
        }
    }
}

impl ExecutorConfig {
    /// Config for `model` with default limits
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Set maximum iterations
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Runs the model/tool loop over a closed set of tools
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    tools: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        tools: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Resolve one turn
    ///
    /// `history` is the prior conversation, oldest first; `message` is the
    /// new input. Returns the model's final text.
    pub async fn run(&self, instruction: &str, history: &[Message], message: &Message) -> Result<String> {
        let mut conversation: Vec<ChatMessage> = history.iter().map(ChatMessage::from).collect();
        conversation.push(ChatMessage::from(message));
        let tools = self.tool_definitions();

        for iteration in 1..=self.config.max_iterations {
            debug!(
                iteration,
                max_iterations = self.config.max_iterations,
                tool_count = tools.len(),
                "Sending request to model"
            );

            let mut request = CompletionRequest::new(&self.config.model)
                .with_system(instruction)
                .with_messages(conversation.clone())
                .with_tools(tools.clone())
                .with_max_tokens(self.config.max_tokens);
            if let Some(temperature) = self.config.temperature {
                request = request.with_temperature(temperature);
            }

            let response = self.provider.complete(request).await?;
            debug!(
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "Model response received"
            );

            let calls: Vec<ToolCall> = response.message.tool_calls().into_iter().cloned().collect();
            if calls.is_empty() {
                if response.stop_reason == StopReason::MaxTokens {
                    warn!("Model response truncated at the token limit");
                }
                return Ok(response.message.text());
            }

            self.check_declared(&calls)?;
            conversation.push(response.message);
            for call in &calls {
                conversation.push(self.execute(call).await);
            }
        }

        warn!(max_iterations = self.config.max_iterations, "Max iterations reached");
        Err(Error::ProcessingFailed(format!(
            "no final answer after {} model calls",
            self.config.max_iterations
        )))
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .list_tools()
            .iter()
            .map(|tool| ToolDefinition::from(tool.descriptor()))
            .collect()
    }

    /// Refuse the whole batch if any call names an undeclared tool
    fn check_declared(&self, calls: &[ToolCall]) -> Result<()> {
        match calls.iter().find(|call| !self.tools.contains(&call.name)) {
            Some(call) => {
                warn!(tool = %call.name, "Model requested an undeclared tool");
                Err(Error::UndeclaredTool(call.name.clone()))
            }
            None => Ok(()),
        }
    }

    /// Execute one declared tool call; failures go back to the model as text
    async fn execute(&self, call: &ToolCall) -> ChatMessage {
        let Some(tool) = self.tools.get(&call.name) else {
            return ChatMessage::tool_error(&call.id, format!("Error: unknown tool {}", call.name));
        };

        let start = std::time::Instant::now();
        match tool.invoke(call.input.clone()).await {
            Ok(result) => {
                info!(
                    tool_name = %call.name,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Tool execution succeeded"
                );
                ChatMessage::tool_result(&call.id, result.to_string())
            }
            Err(e) => {
                warn!(tool_name = %call.name, error = %e, "Tool execution failed");
                ChatMessage::tool_error(&call.id, format!("Error: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_llm::{ContentBlock, ScriptedProvider};
    use agent_tools::{ParameterSpec, Tool, ToolDescriptor, ToolError, ValueType};
    use async_trait::async_trait;
    use serde_json::{Map, Value, json};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct GetNews {
        descriptor: ToolDescriptor,
        calls: AtomicUsize,
    }

    impl GetNews {
        fn new() -> Self {
            Self {
                descriptor: ToolDescriptor::new("get_news", "Latest news for a city")
                    .param(ParameterSpec::required("city", ValueType::String, "City")),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Tool for GetNews {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.descriptor
        }

        async fn execute(&self, args: Map<String, Value>) -> agent_tools::Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if args["city"] == "Atlantis" {
                return Err(ToolError::execution("get_news", "feed unreachable"));
            }
            Ok(json!({"status": "success", "report": "Headline"}))
        }
    }

    fn registry(tool: Arc<GetNews>) -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(tool).unwrap();
        Arc::new(registry)
    }

    #[tokio::test]
    async fn test_tool_result_is_fed_back() {
        let tool = Arc::new(GetNews::new());
        let provider = Arc::new(
            ScriptedProvider::new()
                .with_tool_call("c1", "get_news", json!({"city": "Bengaluru"}))
                .with_text("Here is the news."),
        );
        let executor = AgentExecutor::new(provider.clone(), registry(tool.clone()), ExecutorConfig::default());

        let history = vec![Message::user("hi"), Message::agent("hello")];
        let out = executor
            .run("You are a news assistant.", &history, &Message::user("News for Bengaluru?"))
            .await
            .unwrap();

        assert_eq!(out, "Here is the news.");
        assert_eq!(tool.calls.load(Ordering::SeqCst), 1);

        let requests = provider.requests();
        assert_eq!(requests[0].messages.len(), 3);
        assert_eq!(requests[0].tools[0].name, "get_news");
        let last = requests[1].messages.last().unwrap();
        assert!(matches!(
            &last.blocks[0],
            ContentBlock::ToolResult { is_error: false, content, .. } if content.contains("Headline")
        ));
    }

    #[tokio::test]
    async fn test_undeclared_tool_executes_nothing() {
        let tool = Arc::new(GetNews::new());
        let provider = Arc::new(
            ScriptedProvider::new()
                .with_tool_call("c1", "run_python", json!({"code": "print(1)"})),
        );
        let executor = AgentExecutor::new(provider, registry(tool.clone()), ExecutorConfig::default());

        let err = executor
            .run("instr", &[], &Message::user("write code"))
            .await
            .unwrap_err();
        assert_eq!(err, Error::UndeclaredTool("run_python".into()));
        assert_eq!(tool.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_tool_errors_go_back_to_model() {
        let tool = Arc::new(GetNews::new());
        let provider = Arc::new(
            ScriptedProvider::new()
                .with_tool_call("c1", "get_news", json!({"city": "Atlantis"}))
                .with_tool_call("c2", "get_news", json!({}))
                .with_text("Sorry, no news."),
        );
        let executor = AgentExecutor::new(provider.clone(), registry(tool.clone()), ExecutorConfig::default());

        let out = executor.run("instr", &[], &Message::user("Atlantis?")).await.unwrap();
        assert_eq!(out, "Sorry, no news.");
        // The invalid second call never reached execute
        assert_eq!(tool.calls.load(Ordering::SeqCst), 1);

        let requests = provider.requests();
        let fed_back = requests[2].messages.last().unwrap();
        assert!(matches!(
            &fed_back.blocks[0],
            ContentBlock::ToolResult { is_error: true, content, .. } if content.contains("missing required parameter")
        ));
    }

    #[tokio::test]
    async fn test_max_iterations() {
        let tool = Arc::new(GetNews::new());
        let provider = Arc::new(
            ScriptedProvider::new()
                .with_tool_call("c1", "get_news", json!({"city": "Bengaluru"}))
                .with_tool_call("c2", "get_news", json!({"city": "Bengaluru"})),
        );
        let executor = AgentExecutor::new(
            provider,
            registry(tool),
            ExecutorConfig::default().with_max_iterations(2),
        );

        let err = executor.run("instr", &[], &Message::user("loop")).await.unwrap_err();
        assert!(matches!(err, Error::ProcessingFailed(_)));
    }
}
