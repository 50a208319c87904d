//! Error types for tool invocation

use thiserror::Error;

/// Result type for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors a tool invocation can fail with
///
/// "Nothing found" is never an error: tools report that inside their
/// result value so the calling agent can phrase it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// Arguments did not match the parameter schema; nothing was executed
    #[error("Invalid argument for '{tool}': {reason}")]
    InvalidArgument { tool: String, reason: String },

    /// The tool ran but its underlying I/O failed
    #[error("Tool '{tool}' failed: {cause}")]
    Execution { tool: String, cause: String },
}

impl ToolError {
    /// Shorthand for an invalid argument error
    pub fn invalid(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for an execution error
    pub fn execution(tool: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::Execution {
            tool: tool.into(),
            cause: cause.into(),
        }
    }
}

/// Convert ToolError to agent_core::Error
impl From<ToolError> for agent_core::Error {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::InvalidArgument { tool, reason } => {
                agent_core::Error::InvalidArgument { tool, reason }
            }
            ToolError::Execution { tool, cause } => agent_core::Error::ToolExecution { tool, cause },
        }
    }
}
