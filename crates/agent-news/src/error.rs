//! Error types for wiring the news agents

use thiserror::Error;

/// Result type for news wiring
pub type Result<T> = std::result::Result<T, NewsError>;

/// Faults raised while assembling agents from configuration
#[derive(Debug, Error)]
pub enum NewsError {
    /// Model endpoint could not be set up
    #[error("Model provider error: {0}")]
    Provider(#[from] agent_llm::LLMError),

    /// Remote agent could not be reached or described
    #[error("Remote agent error: {0}")]
    Remote(#[from] agent_a2a::A2AError),

    /// Tool server could not be reached
    #[error("Tool server error: {0}")]
    ToolServer(#[from] agent_mcp::MCPError),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// An agent or coordinator refused its configuration
    #[error(transparent)]
    Agent(#[from] agent_core::Error),

    /// A tool the agent needs is not offered by the server
    #[error("Tool server does not offer '{0}'")]
    MissingTool(String),
}

impl From<NewsError> for agent_core::Error {
    fn from(err: NewsError) -> Self {
        match err {
            NewsError::Agent(inner) => inner,
            other => agent_core::Error::InitializationFailed(other.to_string()),
        }
    }
}
