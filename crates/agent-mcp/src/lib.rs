//! Tool serving over JSON-RPC
//!
//! This crate lets tools live in another process:
//! - [`server`] exposes a [`agent_tools::ToolRegistry`] over HTTP using the
//!   Model Context Protocol methods `initialize`, `tools/list` and
//!   `tools/call`
//! - [`HttpMCPClient`] speaks the same protocol
//! - [`MCPTool`] wraps each remote tool as a local [`agent_tools::Tool`],
//!   so an agent can declare it like any other tool
//!
//! # Example
//!
//! ```no_run
//! use agent_mcp::{HttpMCPClient, MCPClient, MCPTool};
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> agent_mcp::Result<()> {
//! let client = Arc::new(HttpMCPClient::new(
//!     "http://localhost:8080/".to_string(),
//!     HashMap::new(),
//!     Duration::from_secs(30),
//! )?);
//! client.connect().await?;
//!
//! let tools = MCPTool::discover_all(client, Some(&["create_object", "list_objects"][..])).await?;
//! println!("Discovered {} tools", tools.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod server;
pub mod tool;

pub use client::http::HttpMCPClient;
pub use client::{MCPClient, MCPContent, MCPServerInfo, MCPToolDefinition, MCPToolResult};
pub use error::MCPError;
pub use server::ToolServer;
pub use tool::MCPTool;

/// Result type for MCP operations
pub type Result<T> = std::result::Result<T, MCPError>;

/// Protocol revision spoken by client and server
pub const PROTOCOL_VERSION: &str = "2024-11-05";
