//! Router backed by the hosted model

use super::{Candidate, Planning, Route, Router, Segment, TurnPlan, describe_candidates};
use agent_core::Result;
use agent_llm::{ChatMessage, CompletionRequest, LLMProvider};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

const ROUTE_PROMPT: &str = "You route requests to exactly one handler. \
Reply with the handler name only. Reply AMBIGUOUS: <name>, <name> if several \
handlers fit equally well, or NONE if no handler fits. Never do the work yourself.";

const PLAN_PROMPT: &str = "You plan how a request is handled by the listed handlers. \
Split the request into independent segments. Each segment is a chain of handler \
names; the first handler receives the segment input, each later handler receives \
the previous handler's output. Copy segment inputs verbatim from the request. \
Reply with JSON only: {\"segments\": [{\"input\": \"...\", \"steps\": [\"name\"]}]} \
or {\"clarify\": [\"name\", ...]} when the request is ambiguous or matches nothing.";

/// Routes by asking the hosted model
pub struct LlmRouter {
    provider: Arc<dyn LLMProvider>,
    model: String,
    max_tokens: usize,
}

impl LlmRouter {
    /// Create a router using `model` on `provider`
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: 1024,
        }
    }

    /// Set the token limit of routing calls
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    async fn ask(&self, prompt: &str, candidates: &[Candidate], text: &str) -> Result<String> {
        let system = format!("{prompt}\n\nHandlers:\n{}", describe_candidates(candidates));
        let request = CompletionRequest::new(&self.model)
            .with_system(system)
            .with_message(ChatMessage::user(text))
            .with_max_tokens(self.max_tokens)
            .with_temperature(0.0);
        let response = self.provider.complete(request).await?;
        Ok(response.message.text())
    }
}

fn find<'a>(candidates: &'a [Candidate], name: &str) -> Option<&'a Candidate> {
    let name = name.trim().trim_matches(|c: char| matches!(c, '`' | '"' | '\'' | '.'));
    candidates.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

fn known_names(candidates: &[Candidate], names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter_map(|n| find(candidates, n).map(|c| c.name.clone()))
        .collect()
}

fn parse_route(answer: &str, candidates: &[Candidate]) -> Route {
    let answer = answer.trim().trim_matches(|c: char| matches!(c, '`' | '"' | '\'' | '.'));
    let upper = answer.to_ascii_uppercase();

    if upper == "NONE" {
        return Route::NoMatch;
    }
    if upper.starts_with("AMBIGUOUS") {
        let names: Vec<String> = answer
            .split_once(':')
            .map(|(_, list)| list.split(',').map(str::to_string).collect())
            .unwrap_or_default();
        return Route::Ambiguous(known_names(candidates, &names));
    }
    match find(candidates, answer) {
        Some(candidate) => Route::Selected(candidate.name.clone()),
        None => {
            warn!(answer, "model named an unknown handler");
            Route::NoMatch
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlanReply {
    #[serde(default)]
    segments: Vec<Segment>,
    #[serde(default)]
    clarify: Option<Vec<String>>,
}

/// Drop a surrounding ```json fence, if any
fn strip_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(body) = text.strip_prefix("```") else {
        return text;
    };
    let body = body.split_once('\n').map_or("", |(_, rest)| rest);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn parse_plan(answer: &str, candidates: &[Candidate]) -> Planning {
    let reply: PlanReply = match serde_json::from_str(strip_fence(answer)) {
        Ok(reply) => reply,
        Err(e) => {
            warn!(error = %e, "model returned an unreadable plan");
            return Planning::Clarify(Vec::new());
        }
    };

    if let Some(names) = reply.clarify {
        return Planning::Clarify(known_names(candidates, &names));
    }

    let mut segments = Vec::with_capacity(reply.segments.len());
    for mut segment in reply.segments {
        let mut steps = Vec::with_capacity(segment.steps.len());
        for step in &segment.steps {
            match find(candidates, step) {
                Some(candidate) => steps.push(candidate.name.clone()),
                None => {
                    warn!(step = %step, "plan names an unknown handler");
                    return Planning::Clarify(Vec::new());
                }
            }
        }
        if steps.is_empty() {
            return Planning::Clarify(Vec::new());
        }
        segment.steps = steps;
        segments.push(segment);
    }

    if segments.is_empty() {
        return Planning::Clarify(Vec::new());
    }
    Planning::Plan(TurnPlan { segments })
}

#[async_trait]
impl Router for LlmRouter {
    async fn route(&self, intent: &str, candidates: &[Candidate]) -> Result<Route> {
        let answer = self.ask(ROUTE_PROMPT, candidates, intent).await?;
        debug!(answer = %answer, "model route");
        Ok(parse_route(&answer, candidates))
    }

    async fn plan(&self, request: &str, candidates: &[Candidate]) -> Result<Planning> {
        let answer = self.ask(PLAN_PROMPT, candidates, request).await?;
        debug!(answer = %answer, "model plan");
        Ok(parse_plan(&answer, candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::CandidateKind;
    use agent_llm::ScriptedProvider;
    use std::collections::BTreeSet;

    fn candidates() -> Vec<Candidate> {
        ["summarizer_agent", "sentiment_analyzer_agent", "get_news_article"]
            .iter()
            .map(|name| Candidate {
                name: (*name).to_string(),
                description: format!("{name} description"),
                tags: BTreeSet::new(),
                kind: if name.ends_with("agent") {
                    CandidateKind::Agent
                } else {
                    CandidateKind::Tool
                },
            })
            .collect()
    }

    #[test]
    fn test_parse_route() {
        let c = candidates();
        assert_eq!(
            parse_route("  `Summarizer_Agent`. ", &c),
            Route::Selected("summarizer_agent".into())
        );
        assert_eq!(parse_route("NONE", &c), Route::NoMatch);
        assert_eq!(
            parse_route("AMBIGUOUS: summarizer_agent, sentiment_analyzer_agent, bogus", &c),
            Route::Ambiguous(vec![
                "summarizer_agent".into(),
                "sentiment_analyzer_agent".into()
            ])
        );
        assert_eq!(parse_route("translator_agent", &c), Route::NoMatch);
    }

    #[test]
    fn test_parse_fenced_plan() {
        let answer = "```json\n{\"segments\": [{\"input\": \"Summarize: x\", \"steps\": [\"summarizer_agent\", \"sentiment_analyzer_agent\"]}]}\n```";
        let Planning::Plan(plan) = parse_plan(answer, &candidates()) else {
            panic!("expected a plan");
        };
        assert_eq!(plan.segments[0].input, "Summarize: x");
        assert_eq!(plan.segments[0].steps.len(), 2);
    }

    #[test]
    fn test_unknown_step_becomes_clarification() {
        let answer = r#"{"segments": [{"input": "x", "steps": ["translator_agent"]}]}"#;
        assert_eq!(parse_plan(answer, &candidates()), Planning::Clarify(vec![]));
        assert_eq!(parse_plan("not json", &candidates()), Planning::Clarify(vec![]));
        assert_eq!(
            parse_plan(r#"{"clarify": ["summarizer_agent"]}"#, &candidates()),
            Planning::Clarify(vec!["summarizer_agent".into()])
        );
    }

    #[tokio::test]
    async fn test_route_prompts_with_candidates() {
        let provider = Arc::new(ScriptedProvider::new().with_text("sentiment_analyzer_agent"));
        let router = LlmRouter::new(provider.clone(), "test-model");

        let route = router
            .route("How do people feel about this?", &candidates())
            .await
            .unwrap();
        assert_eq!(route, Route::Selected("sentiment_analyzer_agent".into()));

        let requests = provider.requests();
        let system = requests[0].system.as_deref().unwrap();
        assert!(system.contains("- get_news_article (tool)"));
        assert_eq!(requests[0].temperature, Some(0.0));
    }
}
