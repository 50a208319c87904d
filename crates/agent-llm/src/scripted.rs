//! Scripted provider for deterministic tests and offline demos
//!
//! Responses are handed out in the order they were queued; every request
//! is recorded so tests can inspect what the model was shown.

use crate::{
    ChatMessage, ChatRole, CompletionRequest, CompletionResponse, ContentBlock, LLMError,
    LLMProvider, Result, StopReason, TokenUsage, ToolCall,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Provider that replays queued responses
#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<CompletionResponse>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    /// Create an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a plain text answer
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(CompletionResponse {
            message: ChatMessage::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        })
    }

    /// Queue a single tool call
    pub fn with_tool_call(self, id: &str, name: &str, input: Value) -> Self {
        self.push(CompletionResponse {
            message: ChatMessage {
                role: ChatRole::Assistant,
                blocks: vec![ContentBlock::ToolCall(ToolCall {
                    id: id.to_string(),
                    name: name.to_string(),
                    input,
                })],
            },
            stop_reason: StopReason::ToolUse,
            usage: TokenUsage::default(),
        })
    }

    fn push(self, response: CompletionResponse) -> Self {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of queued responses not yet consumed
    pub fn remaining(&self) -> usize {
        self.responses.lock().map(|q| q.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request);
        }
        self.responses
            .lock()
            .map_err(|e| LLMError::UnexpectedResponse(format!("script lock poisoned: {e}")))?
            .pop_front()
            .ok_or_else(|| LLMError::UnexpectedResponse("script exhausted".to_string()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
