//! Multi-agent coordination
//!
//! The [`Coordinator`] is the top-level agent of a conversation. Each turn
//! it asks its router for a plan, runs every planned chain against its
//! registered sub-agents and tools, and aggregates the outputs into one
//! reply. Failures never escape a turn: they are rendered as sentences in
//! the reply.

pub mod coordinator;
pub mod trace;

// Re-export for convenience
pub use coordinator::{Coordinator, CoordinatorBuilder};
pub use trace::{StepOutcome, StepRecord, TurnState, TurnTrace};
