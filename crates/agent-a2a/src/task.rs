//! Remote tasks and their store

use crate::{A2AError, Result};
use agent_core::Message;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Lifecycle of a task
///
/// Moves forward only: `submitted → working → completed | errored`, or
/// straight from `submitted` to a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Submitted,
    Working,
    Completed,
    Errored,
}

impl TaskStatus {
    /// Whether no further transitions are possible
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Errored)
    }

    /// Whether moving to `next` is legal
    pub fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Submitted => next != Self::Submitted,
            Self::Working => next.is_terminal(),
            Self::Completed | Self::Errored => false,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Submitted => "submitted",
            Self::Working => "working",
            Self::Completed => "completed",
            Self::Errored => "errored",
        };
        f.write_str(name)
    }
}

/// One unit of work submitted to a remote agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "id")]
    pub task_id: Uuid,
    pub session_id: String,
    pub status: TaskStatus,
    pub input: Message,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// A freshly submitted task
    pub fn submitted(task_id: Uuid, session_id: impl Into<String>, input: Message) -> Self {
        let now = Utc::now();
        Self {
            task_id,
            session_id: session_id.into(),
            status: TaskStatus::Submitted,
            input,
            output: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `next`, rejecting backward or repeated transitions
    pub fn transition(&mut self, next: TaskStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(A2AError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn start(&mut self) -> Result<()> {
        self.transition(TaskStatus::Working)
    }

    pub fn complete(&mut self, output: Message) -> Result<()> {
        self.transition(TaskStatus::Completed)?;
        self.output = Some(output);
        Ok(())
    }

    pub fn fail(&mut self, detail: impl Into<String>) -> Result<()> {
        self.transition(TaskStatus::Errored)?;
        self.error = Some(detail.into());
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Task storage shared by every session a host serves
///
/// Implementations must tolerate concurrent insert, lookup and update
/// keyed by task id.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Store a new task; fails if the id is taken
    async fn insert(&self, task: Task) -> Result<()>;

    /// Look a task up
    async fn get(&self, task_id: Uuid) -> Result<Option<Task>>;

    /// Replace a stored task, enforcing forward-only status changes
    async fn update(&self, task: Task) -> Result<()>;

    /// Drop terminal tasks last updated before `cutoff`; returns how many
    async fn evict_finished(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}

/// Process-local task store
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, task: Task) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.task_id) {
            return Err(A2AError::DuplicateTask(task.task_id));
        }
        tasks.insert(task.task_id, task);
        Ok(())
    }

    async fn get(&self, task_id: Uuid) -> Result<Option<Task>> {
        Ok(self.tasks.read().await.get(&task_id).cloned())
    }

    async fn update(&self, task: Task) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        let stored = tasks
            .get_mut(&task.task_id)
            .ok_or(A2AError::TaskNotFound(task.task_id))?;
        if stored.status != task.status && !stored.status.can_transition_to(task.status) {
            return Err(A2AError::InvalidTransition {
                from: stored.status,
                to: task.status,
            });
        }
        *stored = task;
        Ok(())
    }

    async fn evict_finished(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|_, task| !(task.is_terminal() && task.updated_at < cutoff));
        Ok(before - tasks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn task() -> Task {
        Task::submitted(Uuid::new_v4(), "session-1", Message::user("Analyze this"))
    }

    #[test]
    fn test_forward_transitions() {
        let mut t = task();
        t.start().unwrap();
        t.complete(Message::agent("positive")).unwrap();
        assert!(t.is_terminal());
        assert_eq!(t.output, Some(Message::agent("positive")));

        let mut direct = task();
        direct.fail("model unavailable").unwrap();
        assert_eq!(direct.status, TaskStatus::Errored);
    }

    #[test]
    fn test_backward_transitions_are_rejected() {
        let mut t = task();
        t.start().unwrap();
        assert!(matches!(
            t.transition(TaskStatus::Submitted),
            Err(A2AError::InvalidTransition { .. })
        ));
        assert!(t.start().is_err());

        t.complete(Message::agent("done")).unwrap();
        assert!(t.fail("late").is_err());
        assert_eq!(t.status, TaskStatus::Completed);
    }

    #[test]
    fn test_wire_format() {
        let t = task();
        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(value["id"], t.task_id.to_string());
        assert_eq!(value["sessionId"], "session-1");
        assert_eq!(value["status"], "submitted");
        assert!(value.get("output").is_none());
    }

    #[tokio::test]
    async fn test_store_rejects_duplicates_and_backward_updates() {
        let store = InMemoryTaskStore::new();
        let mut t = task();
        store.insert(t.clone()).await.unwrap();
        assert!(matches!(
            store.insert(t.clone()).await,
            Err(A2AError::DuplicateTask(_))
        ));

        t.start().unwrap();
        t.complete(Message::agent("ok")).unwrap();
        store.update(t.clone()).await.unwrap();

        let mut stale = t.clone();
        stale.status = TaskStatus::Working;
        assert!(store.update(stale).await.is_err());
        assert_eq!(
            store.get(t.task_id).await.unwrap().unwrap().status,
            TaskStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_store_concurrent_inserts() {
        let store = Arc::new(InMemoryTaskStore::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.insert(task()).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(store.len().await, 16);
    }

    #[tokio::test]
    async fn test_evict_only_old_terminal_tasks() {
        let store = InMemoryTaskStore::new();
        let mut done = task();
        let mut failed = task();
        let mut running = task();
        for t in [&done, &failed, &running] {
            store.insert(t.clone()).await.unwrap();
        }
        done.start().unwrap();
        done.complete(Message::agent("ok")).unwrap();
        failed.fail("boom").unwrap();
        running.start().unwrap();
        for t in [&done, &failed, &running] {
            store.update(t.clone()).await.unwrap();
        }

        let past = Utc::now() - chrono::Duration::hours(1);
        assert_eq!(store.evict_finished(past).await.unwrap(), 0);
        assert_eq!(store.len().await, 3);

        let future = Utc::now() + chrono::Duration::seconds(1);
        assert_eq!(store.evict_finished(future).await.unwrap(), 2);
        assert!(store.get(running.task_id).await.unwrap().is_some());
        assert!(store.get(done.task_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_task() {
        let store = InMemoryTaskStore::new();
        assert!(matches!(
            store.update(task()).await,
            Err(A2AError::TaskNotFound(_))
        ));
    }
}
