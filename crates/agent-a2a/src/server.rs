//! Hosting a local agent over the A2A protocol
//!
//! Routes:
//! - `GET /.well-known/agent.json` returns the [`AgentCard`]
//! - `POST /` accepts JSON-RPC `tasks/send` and `tasks/get`
//!
//! Finished tasks and idle sessions are dropped by [`HostState::sweep`],
//! which [`serve`] runs every minute.

use crate::jsonrpc::{self, Request, Response};
use crate::{AGENT_CARD_PATH, AgentCard, InMemoryTaskStore, Result, Task, TaskStore};
use agent_core::{Agent, InMemorySessionStore, Message, SessionStore};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use futures::FutureExt;
use serde::Deserialize;
use serde_json::Value;
use std::any::Any;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const DEFAULT_TASK_RETENTION: Duration = Duration::from_secs(3600);
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared state of an agent host
#[derive(Clone)]
pub struct HostState {
    agent: Arc<dyn Agent>,
    card: Arc<AgentCard>,
    tasks: Arc<dyn TaskStore>,
    sessions: Arc<dyn SessionStore>,
    task_retention: Duration,
}

impl HostState {
    /// Host `agent` behind `card`, with in-memory task and session stores
    pub fn new(agent: Arc<dyn Agent>, card: AgentCard) -> Self {
        Self {
            agent,
            card: Arc::new(card),
            tasks: Arc::new(InMemoryTaskStore::new()),
            sessions: Arc::new(InMemorySessionStore::new()),
            task_retention: DEFAULT_TASK_RETENTION,
        }
    }

    pub fn with_task_store(mut self, tasks: Arc<dyn TaskStore>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn with_session_store(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = sessions;
        self
    }

    /// How long a finished task stays readable through `tasks/get`
    pub fn with_task_retention(mut self, retention: Duration) -> Self {
        self.task_retention = retention;
        self
    }

    pub fn card(&self) -> &AgentCard {
        &self.card
    }

    /// Drop finished tasks past the retention window and expired sessions
    ///
    /// Returns the number of tasks and sessions removed.
    pub async fn sweep(&self) -> Result<(usize, usize)> {
        let cutoff = chrono::Duration::from_std(self.task_retention)
            .ok()
            .and_then(|retention| Utc::now().checked_sub_signed(retention));
        let tasks = match cutoff {
            Some(cutoff) => self.tasks.evict_finished(cutoff).await?,
            None => 0,
        };
        let sessions = self.sessions.cleanup_expired()?;
        if tasks + sessions > 0 {
            debug!(tasks, sessions, "swept host state");
        }
        Ok((tasks, sessions))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendParams {
    id: Uuid,
    session_id: String,
    message: Message,
}

#[derive(Debug, Deserialize)]
struct GetParams {
    id: Uuid,
}

/// Build the axum router for a host
pub fn router(state: HostState) -> Router {
    Router::new()
        .route(&format!("/{AGENT_CARD_PATH}"), get(agent_card))
        .route("/", post(rpc))
        .with_state(state)
}

/// Bind `addr` and serve until the process stops
pub async fn serve(addr: SocketAddr, state: HostState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, agent = %state.card.name, "serving agent");

    let sweeper = state.clone();
    tokio::spawn(async move {
        let mut ticks = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            ticks.tick().await;
            if let Err(e) = sweeper.sweep().await {
                warn!(error = %e, "host sweep failed");
            }
        }
    });

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn agent_card(State(state): State<HostState>) -> Json<AgentCard> {
    Json(state.card.as_ref().clone())
}

async fn rpc(State(state): State<HostState>, Json(request): Json<Request>) -> Json<Response> {
    debug!(method = %request.method, "rpc request");
    let id = request.id.clone();
    let response = match request.method.as_str() {
        "tasks/send" => match serde_json::from_value::<SendParams>(request.params) {
            Ok(params) => send_task(&state, params).await,
            Err(e) => Err((jsonrpc::INVALID_PARAMS, e.to_string())),
        },
        "tasks/get" => match serde_json::from_value::<GetParams>(request.params) {
            Ok(params) => get_task(&state, params.id).await,
            Err(e) => Err((jsonrpc::INVALID_PARAMS, e.to_string())),
        },
        other => Err((jsonrpc::METHOD_NOT_FOUND, format!("Method not found: {other}"))),
    };

    Json(match response {
        Ok(result) => Response::success(id, result),
        Err((code, message)) => Response::failure(id, code, message),
    })
}

type RpcResult = std::result::Result<Value, (i64, String)>;

async fn send_task(state: &HostState, params: SendParams) -> RpcResult {
    let task = Task::submitted(params.id, params.session_id, params.message);
    state
        .tasks
        .insert(task.clone())
        .await
        .map_err(|e| (jsonrpc::INVALID_PARAMS, e.to_string()))?;
    info!(task_id = %task.task_id, session = %task.session_id, "task submitted");

    tokio::spawn(run_task(state.clone(), task.clone()));
    serde_json::to_value(&task).map_err(|e| (jsonrpc::INTERNAL_ERROR, e.to_string()))
}

async fn get_task(state: &HostState, task_id: Uuid) -> RpcResult {
    match state.tasks.get(task_id).await {
        Ok(Some(task)) => {
            serde_json::to_value(&task).map_err(|e| (jsonrpc::INTERNAL_ERROR, e.to_string()))
        }
        Ok(None) => Err((jsonrpc::TASK_NOT_FOUND, format!("Task not found: {task_id}"))),
        Err(e) => Err((jsonrpc::INTERNAL_ERROR, e.to_string())),
    }
}

/// Drive one task to a terminal status
///
/// Whatever goes wrong, the stored task ends up `completed` or `errored`
/// so that pollers never wait on it forever.
async fn run_task(state: HostState, mut task: Task) {
    let Err(e) = advance(&state, &mut task).await else {
        return;
    };
    error!(task_id = %task.task_id, error = %e, "task bookkeeping failed");

    if !task.is_terminal() {
        if let Err(e) = task.fail(format!("host failure: {e}")) {
            error!(task_id = %task.task_id, error = %e, "could not fail task");
            return;
        }
    }
    if let Err(e) = state.tasks.update(task.clone()).await {
        error!(task_id = %task.task_id, error = %e, "could not record task outcome");
    }
}

async fn advance(state: &HostState, task: &mut Task) -> Result<()> {
    task.start()?;
    state.tasks.update(task.clone()).await?;

    let mut session = state.sessions.get_or_create(&task.session_id)?;
    let outcome = AssertUnwindSafe(state.agent.respond(&session, task.input.clone()))
        .catch_unwind()
        .await;
    match outcome {
        Ok(Ok(reply)) => {
            session.append(task.input.clone());
            session.append(reply.clone());
            state.sessions.save(session)?;
            task.complete(reply)?;
        }
        Ok(Err(e)) => {
            warn!(task_id = %task.task_id, error = %e, "hosted agent failed");
            task.fail(e.to_string())?;
        }
        Err(panic) => {
            let detail = panic_detail(panic.as_ref());
            error!(task_id = %task.task_id, panic = %detail, "hosted agent panicked");
            task.fail(format!("agent panicked: {detail}"))?;
        }
    }
    state.tasks.update(task.clone()).await?;
    Ok(())
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::{AgentDescriptor, SessionState};
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request as HttpRequest, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    struct Upper(AgentDescriptor);

    #[async_trait]
    impl Agent for Upper {
        async fn respond(&self, _session: &SessionState, message: Message) -> agent_core::Result<Message> {
            Ok(Message::agent(message.text().to_uppercase()))
        }

        fn descriptor(&self) -> &AgentDescriptor {
            &self.0
        }
    }

    struct Crashing(AgentDescriptor);

    #[async_trait]
    impl Agent for Crashing {
        async fn respond(&self, _session: &SessionState, _message: Message) -> agent_core::Result<Message> {
            panic!("model client crashed");
        }

        fn descriptor(&self) -> &AgentDescriptor {
            &self.0
        }
    }

    struct BrokenSessions;

    impl SessionStore for BrokenSessions {
        fn get_or_create(&self, _session_id: &str) -> agent_core::Result<SessionState> {
            Err(agent_core::Error::Session("Lock error: poisoned".into()))
        }

        fn get(&self, _session_id: &str) -> agent_core::Result<Option<SessionState>> {
            Ok(None)
        }

        fn save(&self, _session: SessionState) -> agent_core::Result<()> {
            Ok(())
        }

        fn remove(&self, _session_id: &str) -> agent_core::Result<bool> {
            Ok(false)
        }

        fn cleanup_expired(&self) -> agent_core::Result<usize> {
            Ok(0)
        }
    }

    fn state() -> HostState {
        let card = AgentCard::new("upper_agent", "Shouts", "http://localhost:8080/");
        HostState::new(Arc::new(Upper(card.to_descriptor())), card)
    }

    async fn post_rpc(state: HostState, body: Value) -> Value {
        let response = router(state)
            .oneshot(
                HttpRequest::post("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn send(state: &HostState, session_id: &str, text: &str) -> Uuid {
        let task_id = Uuid::new_v4();
        let sent = post_rpc(
            state.clone(),
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tasks/send",
                "params": {"id": task_id, "sessionId": session_id, "message": Message::user(text)}
            }),
        )
        .await;
        assert_eq!(sent["result"]["id"], task_id.to_string());
        task_id
    }

    /// Poll until the task is terminal and return it
    async fn settle(state: &HostState, task_id: Uuid) -> Value {
        for _ in 0..50 {
            let got = post_rpc(
                state.clone(),
                json!({"jsonrpc": "2.0", "id": 2, "method": "tasks/get", "params": {"id": task_id}}),
            )
            .await;
            if matches!(got["result"]["status"].as_str(), Some("completed" | "errored")) {
                return got["result"].clone();
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("task {task_id} never finished");
    }

    #[tokio::test]
    async fn test_panicking_agent_errors_the_task() {
        let card = AgentCard::new("crashing_agent", "Crashes", "http://localhost:8080/");
        let state = HostState::new(Arc::new(Crashing(card.to_descriptor())), card);

        let task_id = send(&state, "s-1", "hello").await;
        let task = settle(&state, task_id).await;
        assert_eq!(task["status"], "errored");
        assert!(task["error"].as_str().unwrap().contains("model client crashed"));
    }

    #[tokio::test]
    async fn test_session_store_failure_errors_the_task() {
        let state = state().with_session_store(Arc::new(BrokenSessions));

        let task_id = send(&state, "s-1", "hello").await;
        let task = settle(&state, task_id).await;
        assert_eq!(task["status"], "errored");
        assert!(task["error"].as_str().unwrap().contains("poisoned"));
    }

    #[tokio::test]
    async fn test_sweep_drops_finished_tasks_and_expired_sessions() {
        let state = state()
            .with_task_retention(Duration::ZERO)
            .with_session_store(Arc::new(InMemorySessionStore::new().with_ttl(-1)));

        let task_id = send(&state, "s-1", "hello").await;
        assert_eq!(settle(&state, task_id).await["status"], "completed");
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(state.sweep().await.unwrap(), (1, 1));
        let gone = post_rpc(
            state.clone(),
            json!({"jsonrpc": "2.0", "id": 3, "method": "tasks/get", "params": {"id": task_id}}),
        )
        .await;
        assert_eq!(gone["error"]["code"], jsonrpc::TASK_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sweep_keeps_recent_tasks() {
        let state = state();
        let task_id = send(&state, "s-1", "hello").await;
        settle(&state, task_id).await;

        assert_eq!(state.sweep().await.unwrap(), (0, 0));
        assert_eq!(settle(&state, task_id).await["status"], "completed");
    }

    #[tokio::test]
    async fn test_card_is_served_at_well_known_path() {
        let response = router(state())
            .oneshot(
                HttpRequest::get("/.well-known/agent.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let card: AgentCard = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(card.name, "upper_agent");
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let reply = post_rpc(state(), json!({"jsonrpc": "2.0", "id": 1, "method": "tasks/cancel"})).await;
        assert_eq!(reply["error"]["code"], jsonrpc::METHOD_NOT_FOUND);
        assert_eq!(reply["id"], 1);
    }

    #[tokio::test]
    async fn test_unknown_task() {
        let reply = post_rpc(
            state(),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tasks/get", "params": {"id": Uuid::new_v4()}}),
        )
        .await;
        assert_eq!(reply["error"]["code"], jsonrpc::TASK_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_send_then_get_reaches_completed() {
        let state = state();
        let task_id = Uuid::new_v4();
        let sent = post_rpc(
            state.clone(),
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tasks/send",
                "params": {"id": task_id, "sessionId": "s-1", "message": Message::user("hello")}
            }),
        )
        .await;
        assert_eq!(sent["result"]["id"], task_id.to_string());

        let mut status = String::new();
        for _ in 0..50 {
            let got = post_rpc(
                state.clone(),
                json!({"jsonrpc": "2.0", "id": 4, "method": "tasks/get", "params": {"id": task_id}}),
            )
            .await;
            status = got["result"]["status"].as_str().unwrap().to_string();
            if status == "completed" {
                assert_eq!(got["result"]["output"]["parts"][0]["text"], "HELLO");
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(status, "completed");
    }

    #[tokio::test]
    async fn test_duplicate_task_id_is_rejected() {
        let state = state();
        let params = json!({"id": Uuid::new_v4(), "sessionId": "s", "message": Message::user("x")});
        let body = json!({"jsonrpc": "2.0", "id": 5, "method": "tasks/send", "params": params});
        post_rpc(state.clone(), body.clone()).await;
        let second = post_rpc(state, body).await;
        assert_eq!(second["error"]["code"], jsonrpc::INVALID_PARAMS);
    }
}
