//! Core Agent trait definition

use crate::{AgentDescriptor, Message, Result, SessionState};
use async_trait::async_trait;

/// Core trait that all agents must implement
///
/// Local agents, remote agent proxies and coordinators all answer a turn
/// through the same contract, so any of them can be registered as a
/// sub-agent of another.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Resolve one turn into a reply
    ///
    /// The session is read-only here; whoever owns the conversation
    /// appends the exchanged messages afterwards.
    async fn respond(&self, session: &SessionState, message: Message) -> Result<Message>;

    /// Get the agent's descriptor
    fn descriptor(&self) -> &AgentDescriptor;

    /// Get the agent's name
    fn name(&self) -> &str {
        &self.descriptor().name
    }
}
