//! Hosted model abstraction
//!
//! Agents never reason on their own: every decision that needs a model goes
//! through an [`LLMProvider`]. This crate holds the provider-agnostic
//! request/response types, the OpenAI-compatible provider used for hosted
//! endpoints, Ollama, LiteLLM and vLLM, and a scripted provider for tests.

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;
pub mod scripted;
pub mod tools;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{ChatMessage, ChatRole, ContentBlock, ToolCall};
pub use provider::LLMProvider;
pub use scripted::ScriptedProvider;
pub use tools::ToolDefinition;
