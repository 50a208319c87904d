//! Error types for the A2A protocol

use crate::TaskStatus;
use thiserror::Error;
use uuid::Uuid;

/// Result type for A2A operations
pub type Result<T> = std::result::Result<T, A2AError>;

/// Errors raised by the A2A client and host
#[derive(Error, Debug)]
pub enum A2AError {
    /// HTTP request could not be completed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote answered with a non-success status code
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON-RPC error object returned by the remote
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Card or task payload could not be read
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base or card URL is not a valid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Illegal task status change
    #[error("Task cannot move from {from} to {to}")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },

    /// No task with this id
    #[error("Task not found: {0}")]
    TaskNotFound(Uuid),

    /// A task with this id already exists
    #[error("Task already exists: {0}")]
    DuplicateTask(Uuid),

    /// Listener could not be bound or served
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Host session store failure
    #[error("Session store error: {0}")]
    Session(#[from] agent_core::Error),
}

impl A2AError {
    /// Map to the core taxonomy, attributing the fault to `agent`
    ///
    /// Anything that happened on the wire is a transport fault; a JSON-RPC
    /// error object means the remote answered but refused the task.
    pub fn for_agent(self, agent: &str) -> agent_core::Error {
        match self {
            Self::Rpc { message, .. } => agent_core::Error::RemoteAgent {
                agent: agent.to_string(),
                detail: message,
            },
            Self::Http(_) | Self::Status { .. } | Self::Json(_) | Self::Url(_) | Self::Io(_) => {
                agent_core::Error::Transport {
                    agent: agent.to_string(),
                    reason: self.to_string(),
                }
            }
            other => agent_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}

impl From<A2AError> for agent_core::Error {
    fn from(err: A2AError) -> Self {
        agent_core::Error::ProcessingFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_is_remote_agent_fault() {
        let err = A2AError::Rpc {
            code: -32603,
            message: "agent crashed".into(),
        };
        assert_eq!(
            err.for_agent("sentiment_analyzer_agent"),
            agent_core::Error::RemoteAgent {
                agent: "sentiment_analyzer_agent".into(),
                detail: "agent crashed".into(),
            }
        );
    }

    #[test]
    fn test_status_error_is_transport_fault() {
        let err = A2AError::Status {
            status: 502,
            body: "bad gateway".into(),
        };
        assert!(matches!(
            err.for_agent("business_analyzer_agent"),
            agent_core::Error::Transport { .. }
        ));
    }
}
