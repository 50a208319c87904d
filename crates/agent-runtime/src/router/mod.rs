//! Routing: choosing which sub-agent or tool handles a request
//!
//! A [`Router`] is consulted by local agents (to delegate a whole turn) and
//! by the coordinator (to plan a turn into chains and independent
//! segments). Two implementations ship: [`KeywordRouter`], deterministic
//! and used in tests and offline demos, and [`LlmRouter`], which asks the
//! hosted model.

mod keyword;
mod llm;

pub use keyword::KeywordRouter;
pub use llm::LlmRouter;

use agent_core::{AgentDescriptor, Result};
use agent_tools::ToolDescriptor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Whether a candidate is delegated to or called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    /// A sub-agent (local or remote)
    Agent,
    /// A tool owned directly by the routing agent
    Tool,
}

/// Something a request can be routed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub description: String,
    pub tags: BTreeSet<String>,
    pub kind: CandidateKind,
}

impl From<&AgentDescriptor> for Candidate {
    fn from(descriptor: &AgentDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            tags: descriptor.capability_tags.clone(),
            kind: CandidateKind::Agent,
        }
    }
}

impl From<&ToolDescriptor> for Candidate {
    fn from(descriptor: &ToolDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            tags: BTreeSet::new(),
            kind: CandidateKind::Tool,
        }
    }
}

/// Outcome of routing a single intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Exactly one candidate matches
    Selected(String),
    /// Several candidates match equally well
    Ambiguous(Vec<String>),
    /// Nothing matches
    NoMatch,
}

/// One independent part of a request, resolved as an ordered chain
///
/// The first step receives `input`; every later step receives the
/// previous step's output text verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Text handed to the first step
    pub input: String,
    /// Candidate names, in execution order
    pub steps: Vec<String>,
    /// Structured arguments for a first step that is a tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Map<String, Value>>,
}

impl Segment {
    /// Single-step segment
    pub fn single(input: impl Into<String>, step: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            steps: vec![step.into()],
            arguments: None,
        }
    }
}

/// Independent segments of one turn, in request order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TurnPlan {
    pub segments: Vec<Segment>,
}

/// Outcome of planning a whole turn
#[derive(Debug, Clone, PartialEq)]
pub enum Planning {
    /// Execute this plan
    Plan(TurnPlan),
    /// Ask the user to clarify; lists the plausible candidates, if any
    Clarify(Vec<String>),
}

/// Pluggable routing capability
#[async_trait]
pub trait Router: Send + Sync {
    /// Match one intent against the candidates
    async fn route(&self, intent: &str, candidates: &[Candidate]) -> Result<Route>;

    /// Break a request into independent chains
    ///
    /// The default treats the whole request as a single one-step segment.
    async fn plan(&self, request: &str, candidates: &[Candidate]) -> Result<Planning> {
        Ok(match self.route(request, candidates).await? {
            Route::Selected(name) => Planning::Plan(TurnPlan {
                segments: vec![Segment::single(request, name)],
            }),
            Route::Ambiguous(names) => Planning::Clarify(names),
            Route::NoMatch => Planning::Clarify(Vec::new()),
        })
    }
}

/// Render candidates as a bullet list for prompts
pub(crate) fn describe_candidates(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(|c| {
            let kind = match c.kind {
                CandidateKind::Agent => "agent",
                CandidateKind::Tool => "tool",
            };
            if c.tags.is_empty() {
                format!("- {} ({kind}): {}", c.name, c.description)
            } else {
                let tags: Vec<&str> = c.tags.iter().map(String::as_str).collect();
                format!(
                    "- {} ({kind}): {} [tags: {}]",
                    c.name,
                    c.description,
                    tags.join(", ")
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
