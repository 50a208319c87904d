//! Model provider trait

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Access to a hosted model
///
/// Implementations translate a [`CompletionRequest`] to the wire format of
/// one service and back.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate one completion
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Provider name (e.g. "openai")
    fn name(&self) -> &str;
}
