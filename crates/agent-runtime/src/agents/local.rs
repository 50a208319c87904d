//! Local agent: an instruction bound to a closed set of tools and sub-agents

use crate::executor::{AgentExecutor, ExecutorConfig};
use crate::router::{Candidate, Route, Router};
use agent_core::{Agent, AgentDescriptor, Error, Message, Result, SessionState};
use agent_llm::LLMProvider;
use agent_tools::{Tool, ToolRegistry, render_output};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// An agent that resolves turns with its own tools or by delegating
///
/// Instruction, tools and sub-agents are fixed at construction. A turn is
/// resolved as follows:
///
/// - with sub-agents, the router is consulted first; a single match gets
///   the whole turn, an ambiguous match is [`Error::RoutingAmbiguity`],
///   and no match falls through to the agent's own tools;
/// - with a model provider, the [`AgentExecutor`] loop runs over the
///   declared tools only;
/// - without a provider, an agent owning exactly one tool with a single
///   text parameter calls it directly with the message text.
///
/// # Example
///
/// ```no_run
/// use agent_core::AgentDescriptor;
/// use agent_runtime::LocalAgent;
/// # fn demo(tool: std::sync::Arc<dyn agent_tools::Tool>) -> agent_core::Result<()> {
/// let summarizer = LocalAgent::builder(AgentDescriptor::new(
///     "summarizer_agent",
///     "Handles summarizing news articles.",
/// ))
/// .instruction("Summarize the given article with the summarize_article tool.")
/// .tool(tool)
/// .build()?;
/// # Ok(())
/// # }
/// ```
pub struct LocalAgent {
    descriptor: AgentDescriptor,
    instruction: String,
    tools: Arc<ToolRegistry>,
    sub_agents: Vec<Arc<dyn Agent>>,
    router: Option<Arc<dyn Router>>,
    executor: Option<AgentExecutor>,
}

impl LocalAgent {
    /// Start building an agent
    pub fn builder(descriptor: AgentDescriptor) -> LocalAgentBuilder {
        LocalAgentBuilder::new(descriptor)
    }

    /// The agent's instruction
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// The declared tools
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Sub-agent names in registration order
    pub fn sub_agent_names(&self) -> Vec<&str> {
        self.sub_agents.iter().map(|a| a.name()).collect()
    }

    /// Try to hand the whole turn to one sub-agent
    async fn delegate(&self, session: &SessionState, message: &Message) -> Result<Option<Message>> {
        let Some(router) = &self.router else {
            return Ok(None);
        };
        let candidates: Vec<Candidate> = self
            .sub_agents
            .iter()
            .map(|a| Candidate::from(a.descriptor()))
            .collect();

        match router.route(&message.text(), &candidates).await? {
            Route::Selected(name) => {
                let Some(agent) = self.sub_agents.iter().find(|a| a.name() == name) else {
                    return Ok(None);
                };
                info!(agent = %self.descriptor.name, sub_agent = %name, "delegating turn");
                agent.respond(session, message.clone()).await.map(Some)
            }
            Route::Ambiguous(candidates) => Err(Error::RoutingAmbiguity { candidates }),
            Route::NoMatch => {
                debug!(agent = %self.descriptor.name, "no sub-agent matched");
                Ok(None)
            }
        }
    }

    /// Call the only tool directly with the message text
    async fn call_sole_tool(&self, message: &Message) -> Result<Option<Message>> {
        let [tool] = self.tools.list_tools() else {
            return Ok(None);
        };
        let descriptor = tool.descriptor();
        let args = descriptor
            .text_arguments(&message.text())
            .ok_or_else(|| Error::InvalidArgument {
                tool: descriptor.name.clone(),
                reason: "the tool needs structured arguments".to_string(),
            })?;
        let output = tool.invoke(args).await?;
        Ok(Some(Message::agent(render_output(&output))))
    }
}

#[async_trait]
impl Agent for LocalAgent {
    #[instrument(skip_all, fields(agent = %self.descriptor.name, session = %session.session_id()))]
    async fn respond(&self, session: &SessionState, message: Message) -> Result<Message> {
        if !self.sub_agents.is_empty() {
            if let Some(reply) = self.delegate(session, &message).await? {
                return Ok(reply);
            }
        }

        if let Some(executor) = &self.executor {
            let text = executor
                .run(&self.instruction, session.history(), &message)
                .await?;
            return Ok(Message::agent(text));
        }

        if let Some(reply) = self.call_sole_tool(&message).await? {
            return Ok(reply);
        }

        if self.sub_agents.is_empty() {
            Err(Error::ProcessingFailed(format!(
                "agent '{}' has no model provider configured",
                self.descriptor.name
            )))
        } else {
            Err(Error::RoutingAmbiguity {
                candidates: Vec::new(),
            })
        }
    }

    fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }
}

/// Builder for [`LocalAgent`]
pub struct LocalAgentBuilder {
    descriptor: AgentDescriptor,
    instruction: String,
    tools: Vec<Arc<dyn Tool>>,
    sub_agents: Vec<Arc<dyn Agent>>,
    router: Option<Arc<dyn Router>>,
    provider: Option<Arc<dyn LLMProvider>>,
    executor_config: ExecutorConfig,
}

impl LocalAgentBuilder {
    /// Create a new builder
    pub fn new(descriptor: AgentDescriptor) -> Self {
        Self {
            descriptor,
            instruction: String::new(),
            tools: Vec::new(),
            sub_agents: Vec::new(),
            router: None,
            provider: None,
            executor_config: ExecutorConfig::default(),
        }
    }

    /// Set the instruction
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Declare a tool
    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Declare a sub-agent
    pub fn sub_agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.sub_agents.push(agent);
        self
    }

    /// Set the router used to pick sub-agents
    pub fn router(mut self, router: Arc<dyn Router>) -> Self {
        self.router = Some(router);
        self
    }

    /// Set the model provider driving the tool loop
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the executor configuration
    pub fn executor_config(mut self, config: ExecutorConfig) -> Self {
        self.executor_config = config;
        self
    }

    /// Build the agent
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - two tools or two sub-agents share a name
    /// - sub-agents are declared without a router
    pub fn build(self) -> Result<LocalAgent> {
        let mut registry = ToolRegistry::new();
        for tool in self.tools {
            registry.register(tool)?;
        }
        let tools = Arc::new(registry);

        let mut seen = HashSet::new();
        for agent in &self.sub_agents {
            if !seen.insert(agent.name().to_string()) {
                return Err(Error::InitializationFailed(format!(
                    "Sub-agent '{}' is registered twice",
                    agent.name()
                )));
            }
        }
        if !self.sub_agents.is_empty() && self.router.is_none() {
            return Err(Error::InitializationFailed(format!(
                "Agent '{}' has sub-agents but no router",
                self.descriptor.name
            )));
        }

        let executor = self
            .provider
            .map(|provider| AgentExecutor::new(provider, tools.clone(), self.executor_config));

        Ok(LocalAgent {
            descriptor: self.descriptor,
            instruction: self.instruction,
            tools,
            sub_agents: self.sub_agents,
            router: self.router,
            executor,
        })
    }
}
