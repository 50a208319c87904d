//! Agent-to-agent (A2A) protocol
//!
//! Lets an [`agent_core::Agent`] run in another process. A host publishes an
//! [`AgentCard`] at `/.well-known/agent.json` and accepts tasks over
//! JSON-RPC at its base URL; a [`RemoteAgentProxy`] discovers the card,
//! submits a [`Task`] and polls it to a terminal status.
//!
//! ```text
//! RemoteAgentProxy ── GET /.well-known/agent.json ──▶ host
//!                  ── tasks/send ──────────────────▶ spawn agent.respond
//!                  ── tasks/get (poll) ────────────▶ TaskStore
//! ```

pub mod card;
pub mod error;
pub mod jsonrpc;
pub mod proxy;
pub mod server;
pub mod task;

pub use card::{AgentCapabilities, AgentCard, AgentSkill};
pub use error::{A2AError, Result};
pub use proxy::{ProxyConfig, RemoteAgentProxy};
pub use server::{HostState, router, serve};
pub use task::{InMemoryTaskStore, Task, TaskStatus, TaskStore};

/// Path of the capability card, relative to an agent's base URL
pub const AGENT_CARD_PATH: &str = ".well-known/agent.json";
