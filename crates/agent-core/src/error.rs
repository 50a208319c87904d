//! Error types for agent-core
//!
//! Every fault a turn can hit is expressed here so that the outermost agent
//! can turn it into a reply instead of propagating it to the user.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// Agent initialization failed
    #[error("Agent initialization failed: {0}")]
    InitializationFailed(String),

    /// Agent processing failed
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),

    /// Tool input did not match the tool's parameter schema
    #[error("Invalid argument for tool '{tool}': {reason}")]
    InvalidArgument { tool: String, reason: String },

    /// I/O fault inside a tool
    #[error("Tool '{tool}' failed: {cause}")]
    ToolExecution { tool: String, cause: String },

    /// An agent attempted to call a tool outside its declared set
    #[error("Tool '{0}' is not declared for this agent")]
    UndeclaredTool(String),

    /// Network fault while talking to a remote agent
    #[error("Transport error talking to '{agent}': {reason}")]
    Transport { agent: String, reason: String },

    /// Remote task did not reach a terminal state in time
    #[error("Remote agent '{agent}' did not finish within {after:?}")]
    RemoteTimeout { agent: String, after: Duration },

    /// Remote task finished in the errored state
    #[error("Remote agent '{agent}' reported an error: {detail}")]
    RemoteAgent { agent: String, detail: String },

    /// No single sub-agent or tool matches the request
    #[error("Request is ambiguous; candidates: {candidates:?}")]
    RoutingAmbiguity { candidates: Vec<String> },

    /// Session store failure
    #[error("Session error: {0}")]
    Session(String),
}

impl Error {
    /// Render the error as a sentence suitable for a conversational reply.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidArgument { tool, reason } => {
                format!("I could not use {tool} because the request was missing something: {reason}.")
            }
            Self::ToolExecution { tool, cause } => {
                format!("The {tool} tool ran into a problem: {cause}.")
            }
            Self::UndeclaredTool(tool) => {
                format!("I am not allowed to use {tool}, so I stopped before doing anything.")
            }
            Self::Transport { agent, reason } => {
                format!("I could not reach {agent}: {reason}.")
            }
            Self::RemoteTimeout { agent, after } => format!(
                "{agent} did not answer within {} seconds. You can ask again.",
                after.as_secs()
            ),
            Self::RemoteAgent { agent, detail } => {
                format!("{agent} was unable to complete the request: {detail}.")
            }
            Self::RoutingAmbiguity { candidates } if candidates.is_empty() => {
                "I am not sure what you would like me to do. Could you rephrase the request?"
                    .to_string()
            }
            Self::RoutingAmbiguity { candidates } => format!(
                "I am not sure which of these you want: {}. Could you clarify?",
                candidates.join(", ")
            ),
            other => format!("Something went wrong: {other}."),
        }
    }

    /// Whether the fault came from a remote agent boundary
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::RemoteTimeout { .. } | Self::RemoteAgent { .. }
        )
    }
}
