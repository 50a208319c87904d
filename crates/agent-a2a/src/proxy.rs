//! Local handle for an agent hosted elsewhere

use crate::jsonrpc::{Request, Response};
use crate::{A2AError, AGENT_CARD_PATH, AgentCard, Result, Task, TaskStatus};
use agent_core::{Agent, AgentDescriptor, Message, SessionState};
use agent_utils::AppConfig;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};
use url::Url;
use uuid::Uuid;

/// Timing of remote calls
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Upper bound for one delegated turn, submission included
    pub timeout: Duration,
    /// Pause between status polls
    pub poll_interval: Duration,
    /// Timeout of a single HTTP request
    pub request_timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ProxyConfig {
    /// Timings from process configuration
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout: config.remote_timeout,
            poll_interval: config.remote_poll_interval,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

/// An [`Agent`] that forwards each turn to a remote host as a task
///
/// The remote card is fetched on first use and cached. Nothing is retried:
/// a fault surfaces as `Transport`, an errored task as `RemoteAgent`, and
/// a task still running after [`ProxyConfig::timeout`] as `RemoteTimeout`.
/// On timeout the proxy only stops waiting; the remote task keeps running.
pub struct RemoteAgentProxy {
    descriptor: AgentDescriptor,
    base_url: Url,
    config: ProxyConfig,
    http: reqwest::Client,
    card: OnceCell<AgentCard>,
    request_id: AtomicU64,
}

impl RemoteAgentProxy {
    /// Proxy with a locally declared descriptor; the card is resolved lazily
    pub fn new(descriptor: AgentDescriptor, base_url: &str, config: ProxyConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            descriptor,
            base_url: normalize_base(base_url)?,
            config,
            http,
            card: OnceCell::new(),
            request_id: AtomicU64::new(0),
        })
    }

    /// Proxy whose descriptor comes from the remote card
    pub async fn discover(base_url: &str, config: ProxyConfig) -> Result<Self> {
        let mut proxy = Self::new(AgentDescriptor::new("", ""), base_url, config)?;
        let card = proxy.fetch_card().await?;
        info!(agent = %card.name, url = %card.url, "discovered remote agent");
        proxy.descriptor = card.to_descriptor();
        proxy.card = OnceCell::new_with(Some(card));
        Ok(proxy)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The remote card, fetched once
    pub async fn card(&self) -> Result<&AgentCard> {
        self.card.get_or_try_init(|| self.fetch_card()).await
    }

    async fn fetch_card(&self) -> Result<AgentCard> {
        let url = self.base_url.join(AGENT_CARD_PATH)?;
        debug!(%url, "fetching agent card");
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(A2AError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }

    /// Send one JSON-RPC call to the card's endpoint
    async fn call<T: DeserializeOwned>(&self, endpoint: &Url, method: &str, params: Value) -> Result<T> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed) + 1;
        let request = Request::new(id, method, params);

        let response = self.http.post(endpoint.clone()).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(A2AError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let response: Response = response.json().await?;
        if let Some(error) = response.error {
            return Err(A2AError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(serde_json::from_value(response.result.unwrap_or(Value::Null))?)
    }

    /// Submit and poll until the task is terminal
    async fn run_task(&self, session: &SessionState, message: Message) -> agent_core::Result<Message> {
        let name = self.name();
        let card = self.card().await.map_err(|e| e.for_agent(name))?;
        let endpoint = Url::parse(&card.url)
            .map_err(|e| A2AError::from(e).for_agent(name))?;

        let task_id = Uuid::new_v4();
        let mut task: Task = self
            .call(
                &endpoint,
                "tasks/send",
                json!({"id": task_id, "sessionId": session.session_id(), "message": message}),
            )
            .await
            .map_err(|e| e.for_agent(name))?;
        debug!(%task_id, status = %task.status, "task submitted");

        loop {
            match task.status {
                TaskStatus::Completed => {
                    return task.output.ok_or_else(|| agent_core::Error::RemoteAgent {
                        agent: name.to_string(),
                        detail: "task completed without output".to_string(),
                    });
                }
                TaskStatus::Errored => {
                    return Err(agent_core::Error::RemoteAgent {
                        agent: name.to_string(),
                        detail: task.error.unwrap_or_else(|| "unknown error".to_string()),
                    });
                }
                TaskStatus::Submitted | TaskStatus::Working => {
                    tokio::time::sleep(self.config.poll_interval).await;
                    task = self
                        .call(&endpoint, "tasks/get", json!({"id": task_id}))
                        .await
                        .map_err(|e| e.for_agent(name))?;
                }
            }
        }
    }
}

#[async_trait]
impl Agent for RemoteAgentProxy {
    #[instrument(skip_all, fields(agent = %self.descriptor.name))]
    async fn respond(&self, session: &SessionState, message: Message) -> agent_core::Result<Message> {
        match tokio::time::timeout(self.config.timeout, self.run_task(session, message)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(after = ?self.config.timeout, "remote task timed out");
                Err(agent_core::Error::RemoteTimeout {
                    agent: self.name().to_string(),
                    after: self.config.timeout,
                })
            }
        }
    }

    fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }
}

/// Parse a base URL so that relative joins stay below it
fn normalize_base(base_url: &str) -> Result<Url> {
    if base_url.ends_with('/') {
        Ok(Url::parse(base_url)?)
    } else {
        Ok(Url::parse(&format!("{base_url}/"))?)
    }
}
