//! Per-turn execution trace kept in session scratch

use agent_runtime::CandidateKind;
use serde::{Deserialize, Serialize};

/// Coordinator turn states, in the order they are entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    Received,
    Routing,
    ToolCall,
    Delegating,
    Aggregating,
    Responded,
}

/// What happened to one step of a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Completed { output: String },
    Failed { error: String },
    /// Not run because an earlier step in the chain failed
    Skipped,
}

/// One executed (or skipped) chain step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub target: String,
    pub kind: CandidateKind,
    /// Input text handed to the step; empty when skipped
    pub input: String,
    pub outcome: StepOutcome,
}

impl StepRecord {
    /// Whether the step completed
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, StepOutcome::Completed { .. })
    }
}

/// Trace of one coordinator turn
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnTrace {
    /// Request text as received
    pub request: String,
    /// States entered, in order
    pub states: Vec<TurnState>,
    /// Step records per segment, in request order
    pub segments: Vec<Vec<StepRecord>>,
    /// Candidates offered back to the user when the turn was not routable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarification: Option<Vec<String>>,
}

impl TurnTrace {
    pub(crate) fn new(request: impl Into<String>) -> Self {
        Self {
            request: request.into(),
            states: vec![TurnState::Received],
            ..Self::default()
        }
    }

    pub(crate) fn enter(&mut self, state: TurnState) {
        tracing::debug!(?state, "turn state");
        self.states.push(state);
    }

    /// All step records, flattened in request order
    pub fn steps(&self) -> impl Iterator<Item = &StepRecord> {
        self.segments.iter().flatten()
    }
}
