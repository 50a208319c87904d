//! Agent runtime: local agents, the model/tool loop and routing
//!
//! This crate provides the [`AgentExecutor`] model loop, the pluggable
//! [`Router`] capability with keyword and model-backed implementations,
//! and [`LocalAgent`], which binds an instruction to a closed set of tools
//! and sub-agents.

pub mod agents;
pub mod executor;
pub mod router;

// Re-export key types
pub use agents::{LocalAgent, LocalAgentBuilder};
pub use executor::{AgentExecutor, ExecutorConfig};
pub use router::{
    Candidate, CandidateKind, KeywordRouter, LlmRouter, Planning, Route, Router, Segment, TurnPlan,
};
