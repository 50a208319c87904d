//! Coordinator: routes a turn among sub-agents and tools

use crate::trace::{StepOutcome, StepRecord, TurnState, TurnTrace};
use agent_core::session::keys;
use agent_core::{Agent, AgentDescriptor, ContentPart, Error, Message, Result, Role, SessionState};
use agent_runtime::{Candidate, CandidateKind, Planning, Router, Segment};
use agent_tools::{Tool, render_output};
use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Clone)]
enum Handler {
    Agent(Arc<dyn Agent>),
    Tool(Arc<dyn Tool>),
}

impl Handler {
    fn kind(&self) -> CandidateKind {
        match self {
            Self::Agent(_) => CandidateKind::Agent,
            Self::Tool(_) => CandidateKind::Tool,
        }
    }
}

/// Top-level agent that plans a turn and delegates every part of it
///
/// The coordinator never does specialised work itself: every segment of a
/// plan is a chain of registered sub-agents or tools. Within a chain each
/// step receives the previous step's output verbatim. Independent segments
/// run concurrently by default and are reported in request order. A failed
/// step ends its chain with a user-visible failure line; other segments
/// still complete.
///
/// # Example
///
/// ```no_run
/// use agent_core::AgentDescriptor;
/// use agent_runtime::KeywordRouter;
/// use agent_workflow::Coordinator;
/// use std::sync::Arc;
///
/// # fn demo(summarizer: Arc<dyn agent_core::Agent>, sentiment: Arc<dyn agent_core::Agent>) -> agent_core::Result<()> {
/// let root = Coordinator::builder(AgentDescriptor::new("root_agent", "News orchestrator"))
///     .sub_agent(summarizer)
///     .sub_agent(sentiment)
///     .router(Arc::new(KeywordRouter::new()))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct Coordinator {
    descriptor: AgentDescriptor,
    handlers: Vec<(String, Handler)>,
    candidates: Vec<Candidate>,
    router: Arc<dyn Router>,
    concurrent: bool,
}

impl Coordinator {
    /// Start building a coordinator
    pub fn builder(descriptor: AgentDescriptor) -> CoordinatorBuilder {
        CoordinatorBuilder::new(descriptor)
    }

    /// Routing candidates in registration order
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Run one turn and record it in the session
    ///
    /// Appends the user message and the reply to the history and stores the
    /// [`TurnTrace`] under [`keys::LAST_TURN`].
    pub async fn run_turn(&self, session: &mut SessionState, message: Message) -> Result<Message> {
        let (reply, trace) = self.execute(session, &message).await;
        session.append(message);
        session.append(reply.clone());
        session.insert_typed(keys::LAST_TURN, &trace)?;
        Ok(reply)
    }

    /// Run one turn without touching the session
    #[instrument(skip_all, fields(coordinator = %self.descriptor.name, session = %session.session_id()))]
    pub async fn execute(&self, session: &SessionState, message: &Message) -> (Message, TurnTrace) {
        let request = message.text();
        let mut trace = TurnTrace::new(&request);

        trace.enter(TurnState::Routing);
        let planning = if message.is_empty() {
            Ok(Planning::Clarify(Vec::new()))
        } else {
            self.router.plan(&request, &self.candidates).await
        };

        let plan = match planning {
            Ok(Planning::Plan(plan)) => plan,
            Ok(Planning::Clarify(candidates)) => {
                let text = Error::RoutingAmbiguity {
                    candidates: candidates.clone(),
                }
                .user_message();
                trace.clarification = Some(candidates);
                trace.enter(TurnState::Responded);
                return (Message::agent(text), trace);
            }
            Err(e) => {
                warn!(error = %e, "routing failed");
                trace.enter(TurnState::Responded);
                return (Message::agent(e.user_message()), trace);
            }
        };

        let runs = plan
            .segments
            .iter()
            .map(|segment| self.run_segment(session, segment));
        let results: Vec<(Vec<String>, Vec<StepRecord>)> = if self.concurrent {
            join_all(runs).await
        } else {
            let mut results = Vec::with_capacity(plan.segments.len());
            for run in runs {
                results.push(run.await);
            }
            results
        };

        let mut parts = Vec::new();
        for (lines, records) in results {
            for record in &records {
                match (&record.outcome, record.kind) {
                    (StepOutcome::Skipped, _) => {}
                    (_, CandidateKind::Agent) => trace.enter(TurnState::Delegating),
                    (_, CandidateKind::Tool) => trace.enter(TurnState::ToolCall),
                }
            }
            parts.extend(lines.into_iter().map(ContentPart::text));
            trace.segments.push(records);
        }

        trace.enter(TurnState::Aggregating);
        let reply = Message::new(Role::Agent, parts);
        trace.enter(TurnState::Responded);
        (reply, trace)
    }

    /// Run one chain; returns reply lines and step records
    async fn run_segment(&self, session: &SessionState, segment: &Segment) -> (Vec<String>, Vec<StepRecord>) {
        let mut lines = Vec::new();
        let mut records = Vec::new();
        let mut input = segment.input.clone();

        for (index, target) in segment.steps.iter().enumerate() {
            let Some(handler) = self.handler(target) else {
                let err = Error::RoutingAmbiguity {
                    candidates: Vec::new(),
                };
                lines.push(err.user_message());
                break;
            };
            let arguments = if index == 0 { segment.arguments.clone() } else { None };

            match self.run_step(session, target, handler, &input, arguments).await {
                Ok(output) => {
                    records.push(StepRecord {
                        target: target.clone(),
                        kind: handler.kind(),
                        input: std::mem::take(&mut input),
                        outcome: StepOutcome::Completed {
                            output: output.clone(),
                        },
                    });
                    lines.push(output.clone());
                    input = output;
                }
                Err(e) => {
                    warn!(step = %target, error = %e, "step failed");
                    records.push(StepRecord {
                        target: target.clone(),
                        kind: handler.kind(),
                        input,
                        outcome: StepOutcome::Failed {
                            error: e.to_string(),
                        },
                    });
                    lines.push(e.user_message());

                    let skipped: Vec<&String> = segment.steps[index + 1..].iter().collect();
                    if !skipped.is_empty() {
                        let names: Vec<&str> = skipped.iter().map(|s| s.as_str()).collect();
                        lines.push(format!(
                            "I did not continue with {} because the previous step failed.",
                            names.join(", ")
                        ));
                    }
                    for name in skipped {
                        records.push(StepRecord {
                            target: name.clone(),
                            kind: self.handler(name).map_or(CandidateKind::Agent, Handler::kind),
                            input: String::new(),
                            outcome: StepOutcome::Skipped,
                        });
                    }
                    break;
                }
            }
        }

        (lines, records)
    }

    async fn run_step(
        &self,
        session: &SessionState,
        target: &str,
        handler: &Handler,
        input: &str,
        arguments: Option<serde_json::Map<String, Value>>,
    ) -> Result<String> {
        match handler {
            Handler::Agent(agent) => {
                info!(sub_agent = %target, "delegating");
                let reply = agent.respond(session, Message::user(input)).await?;
                Ok(reply.text())
            }
            Handler::Tool(tool) => {
                info!(tool = %target, "calling tool");
                let args = match arguments {
                    Some(map) => Value::Object(map),
                    None => tool.descriptor().text_arguments(input).ok_or_else(|| {
                        Error::InvalidArgument {
                            tool: target.to_string(),
                            reason: "it needs more than one piece of text".to_string(),
                        }
                    })?,
                };
                let output = tool.invoke(args).await?;
                Ok(render_output(&output))
            }
        }
    }

    fn handler(&self, name: &str) -> Option<&Handler> {
        self.handlers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, handler)| handler)
    }
}

#[async_trait]
impl Agent for Coordinator {
    async fn respond(&self, session: &SessionState, message: Message) -> Result<Message> {
        let (reply, _) = self.execute(session, &message).await;
        Ok(reply)
    }

    fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }
}

/// Builder for [`Coordinator`]
pub struct CoordinatorBuilder {
    descriptor: AgentDescriptor,
    handlers: Vec<Handler>,
    router: Option<Arc<dyn Router>>,
    concurrent: bool,
}

impl CoordinatorBuilder {
    /// Create a new builder
    pub fn new(descriptor: AgentDescriptor) -> Self {
        Self {
            descriptor,
            handlers: Vec::new(),
            router: None,
            concurrent: true,
        }
    }

    /// Register a sub-agent (local agent or remote proxy)
    pub fn sub_agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.handlers.push(Handler::Agent(agent));
        self
    }

    /// Register a tool owned by the coordinator
    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.handlers.push(Handler::Tool(tool));
        self
    }

    /// Set the router
    pub fn router(mut self, router: Arc<dyn Router>) -> Self {
        self.router = Some(router);
        self
    }

    /// Run independent segments concurrently (default) or one by one
    pub fn concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    /// Build the coordinator
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - no router is set
    /// - nothing is registered
    /// - two registrations share a name
    pub fn build(self) -> Result<Coordinator> {
        let router = self.router.ok_or_else(|| {
            Error::InitializationFailed("Coordinator router not set".to_string())
        })?;
        if self.handlers.is_empty() {
            return Err(Error::InitializationFailed(
                "Coordinator has no sub-agents or tools".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut handlers = Vec::with_capacity(self.handlers.len());
        let mut candidates = Vec::with_capacity(self.handlers.len());
        for handler in self.handlers {
            let candidate = match &handler {
                Handler::Agent(agent) => Candidate::from(agent.descriptor()),
                Handler::Tool(tool) => Candidate::from(tool.descriptor()),
            };
            if !seen.insert(candidate.name.clone()) {
                return Err(Error::InitializationFailed(format!(
                    "'{}' is registered twice",
                    candidate.name
                )));
            }
            handlers.push((candidate.name.clone(), handler));
            candidates.push(candidate);
        }

        Ok(Coordinator {
            descriptor: self.descriptor,
            handlers,
            candidates,
            router,
            concurrent: self.concurrent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_runtime::KeywordRouter;
    use agent_tools::{ParameterSpec, ToolDescriptor, ValueType};
    use serde_json::{Map, json};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every input and answers with a fixed prefix
    struct Recorder {
        descriptor: AgentDescriptor,
        inputs: Mutex<Vec<String>>,
        delay: Duration,
        fail: Option<Error>,
    }

    impl Recorder {
        fn new(name: &str, tag: &str) -> Self {
            Self {
                descriptor: AgentDescriptor::new(name, format!("{name} description")).with_tag(tag),
                inputs: Mutex::new(Vec::new()),
                delay: Duration::ZERO,
                fail: None,
            }
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn failing(mut self, error: Error) -> Self {
            self.fail = Some(error);
            self
        }

        fn inputs(&self) -> Vec<String> {
            self.inputs.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Agent for Recorder {
        async fn respond(&self, _session: &SessionState, message: Message) -> Result<Message> {
            self.inputs.lock().unwrap().push(message.text());
            tokio::time::sleep(self.delay).await;
            if let Some(err) = &self.fail {
                return Err(err.clone());
            }
            Ok(Message::agent(format!("[{}]", self.descriptor.name)))
        }

        fn descriptor(&self) -> &AgentDescriptor {
            &self.descriptor
        }
    }

    struct FetchArticle(ToolDescriptor);

    #[async_trait]
    impl Tool for FetchArticle {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.0
        }

        async fn execute(&self, args: Map<String, Value>) -> agent_tools::Result<Value> {
            Ok(json!(format!("Article at {}", args["article_url"].as_str().unwrap_or_default())))
        }
    }

    fn fetch_tool() -> Arc<FetchArticle> {
        Arc::new(FetchArticle(
            ToolDescriptor::new("get_news_article", "Fetches an article")
                .param(ParameterSpec::required("article_url", ValueType::String, "URL"))
                .returns(ValueType::String),
        ))
    }

    fn descriptor() -> AgentDescriptor {
        AgentDescriptor::new("root_agent", "Orchestrates news analysis")
    }

    #[tokio::test]
    async fn test_business_impact_is_delegated_verbatim() {
        let business = Arc::new(Recorder::new("business_analyzer_agent", "business impact"));
        let summarizer = Arc::new(Recorder::new("summarizer_agent", "summarize"));
        let coordinator = Coordinator::builder(descriptor())
            .sub_agent(summarizer.clone())
            .sub_agent(business.clone())
            .router(Arc::new(KeywordRouter::new()))
            .build()
            .unwrap();

        let request = "Analyze the business impact of: Acme cuts 10% of staff.\nShares fell.";
        let reply = coordinator
            .respond(&SessionState::new("s"), Message::user(request))
            .await
            .unwrap();

        assert_eq!(reply.text(), "[business_analyzer_agent]");
        assert_eq!(business.inputs(), vec![request.to_string()]);
        assert!(summarizer.inputs().is_empty());
    }

    #[tokio::test]
    async fn test_chain_forwards_previous_output_verbatim() {
        let summarizer = Arc::new(Recorder::new("summarizer_agent", "summarize"));
        let sentiment = Arc::new(Recorder::new("sentiment_analyzer_agent", "sentiment"));
        let coordinator = Coordinator::builder(descriptor())
            .sub_agent(summarizer.clone())
            .sub_agent(sentiment.clone())
            .router(Arc::new(KeywordRouter::new()))
            .build()
            .unwrap();

        let reply = coordinator
            .respond(
                &SessionState::new("s"),
                Message::user("Summarize article X then get its sentiment: long article body"),
            )
            .await
            .unwrap();

        assert_eq!(sentiment.inputs(), vec!["[summarizer_agent]".to_string()]);
        assert_eq!(
            reply.text(),
            "[summarizer_agent]\n[sentiment_analyzer_agent]"
        );
    }

    #[tokio::test]
    async fn test_fan_out_keeps_request_order() {
        let slow = Arc::new(
            Recorder::new("sentiment_analyzer_agent", "sentiment").delayed(Duration::from_millis(150)),
        );
        let fast = Arc::new(Recorder::new("business_analyzer_agent", "business impact"));
        let coordinator = Coordinator::builder(descriptor())
            .sub_agent(slow.clone())
            .sub_agent(fast.clone())
            .router(Arc::new(KeywordRouter::new()))
            .build()
            .unwrap();

        let reply = coordinator
            .respond(
                &SessionState::new("s"),
                Message::user("sentiment of the chip market; business impact of the tariffs"),
            )
            .await
            .unwrap();

        assert_eq!(reply.parts.len(), 2);
        assert_eq!(
            reply.text(),
            "[sentiment_analyzer_agent]\n[business_analyzer_agent]"
        );
    }

    #[tokio::test]
    async fn test_failure_stops_chain_but_not_other_segments() {
        let summarizer = Arc::new(Recorder::new("summarizer_agent", "summarize").failing(
            Error::RemoteTimeout {
                agent: "summarizer_agent".into(),
                after: Duration::from_secs(5),
            },
        ));
        let sentiment = Arc::new(Recorder::new("sentiment_analyzer_agent", "sentiment"));
        let business = Arc::new(Recorder::new("business_analyzer_agent", "business impact"));
        let coordinator = Coordinator::builder(descriptor())
            .sub_agent(summarizer.clone())
            .sub_agent(sentiment.clone())
            .sub_agent(business.clone())
            .router(Arc::new(KeywordRouter::new()))
            .build()
            .unwrap();

        let mut session = SessionState::new("s");
        let reply = coordinator
            .run_turn(
                &mut session,
                Message::user("business impact of layoffs; summarize then sentiment: text"),
            )
            .await
            .unwrap();

        let text = reply.text();
        assert!(text.starts_with("[business_analyzer_agent]"));
        assert!(text.contains("summarizer_agent did not answer within 5 seconds"));
        assert!(text.contains("did not continue with sentiment_analyzer_agent"));
        assert!(sentiment.inputs().is_empty());

        let trace: TurnTrace = session.get_typed(keys::LAST_TURN).unwrap().unwrap();
        assert_eq!(trace.segments.len(), 2);
        assert_eq!(trace.segments[1][1].outcome, StepOutcome::Skipped);
        assert!(!trace.segments[1][0].succeeded());
    }

    #[tokio::test]
    async fn test_ambiguity_asks_for_clarification() {
        let summarizer = Arc::new(Recorder::new("summarizer_agent", "article"));
        let sentiment = Arc::new(Recorder::new("sentiment_analyzer_agent", "article"));
        let coordinator = Coordinator::builder(descriptor())
            .sub_agent(summarizer.clone())
            .sub_agent(sentiment.clone())
            .router(Arc::new(KeywordRouter::new()))
            .build()
            .unwrap();

        let mut session = SessionState::new("s");
        let reply = coordinator
            .run_turn(&mut session, Message::user("do something with this article"))
            .await
            .unwrap();

        assert!(reply.text().contains("summarizer_agent, sentiment_analyzer_agent"));
        assert!(summarizer.inputs().is_empty());
        assert!(sentiment.inputs().is_empty());

        let trace: TurnTrace = session.get_typed(keys::LAST_TURN).unwrap().unwrap();
        assert_eq!(
            trace.states,
            vec![TurnState::Received, TurnState::Routing, TurnState::Responded]
        );
    }

    #[tokio::test]
    async fn test_tool_step_and_history() {
        let summarizer = Arc::new(Recorder::new("summarizer_agent", "summarize"));
        let coordinator = Coordinator::builder(descriptor())
            .tool(fetch_tool())
            .sub_agent(summarizer.clone())
            .router(Arc::new(
                KeywordRouter::new().with_keywords("get_news_article", ["fetch"]),
            ))
            .build()
            .unwrap();

        let mut session = SessionState::new("s");
        let reply = coordinator
            .run_turn(&mut session, Message::user("fetch then summarize"))
            .await
            .unwrap();

        assert_eq!(
            summarizer.inputs(),
            vec!["Article at fetch then summarize".to_string()]
        );
        assert_eq!(reply.parts.len(), 2);
        assert_eq!(session.history().len(), 2);

        let trace: TurnTrace = session.get_typed(keys::LAST_TURN).unwrap().unwrap();
        assert_eq!(
            trace.states,
            vec![
                TurnState::Received,
                TurnState::Routing,
                TurnState::ToolCall,
                TurnState::Delegating,
                TurnState::Aggregating,
                TurnState::Responded
            ]
        );
    }

    #[test]
    fn test_builder_rejects_duplicates_across_agents_and_tools() {
        let clash = Arc::new(Recorder::new("get_news_article", "news"));
        let result = Coordinator::builder(descriptor())
            .tool(fetch_tool())
            .sub_agent(clash)
            .router(Arc::new(KeywordRouter::new()))
            .build();
        assert!(matches!(result, Err(Error::InitializationFailed(_))));

        let empty = Coordinator::builder(descriptor())
            .router(Arc::new(KeywordRouter::new()))
            .build();
        assert!(empty.is_err());
    }
}
