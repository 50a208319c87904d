//! Agent constructors for the news demos

pub mod analyzers;
pub mod assistant;

pub use analyzers::{business_analyzer_agent, sentiment_analyzer_agent, summarizer_agent};
pub use assistant::{NEWS_ASSISTANT, STORAGE_ASSISTANT, news_assistant, storage_news_assistant};

use agent_llm::LLMProvider;
use agent_llm::providers::{OpenAIConfig, OpenAIProvider};
use agent_runtime::{ExecutorConfig, LocalAgentBuilder};
use agent_utils::AppConfig;
use std::sync::Arc;

use crate::Result;

/// Which model, if any, drives an agent's tool loop
///
/// Without a provider an agent only answers through its sole tool.
#[derive(Clone, Default)]
pub struct ModelBinding {
    provider: Option<Arc<dyn LLMProvider>>,
    config: ExecutorConfig,
}

impl ModelBinding {
    /// No model; agents fall back to calling their only tool
    pub fn offline() -> Self {
        Self::default()
    }

    /// Drive agents with `provider` running `model`
    pub fn hosted(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider: Some(provider),
            config: ExecutorConfig::for_model(model),
        }
    }

    /// OpenAI-compatible endpoint from the process configuration
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        let provider = OpenAIProvider::with_config(OpenAIConfig::from_app_config(config))?;
        Ok(Self::hosted(Arc::new(provider), &config.model))
    }

    /// Replace the executor limits
    pub fn with_executor_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn provider(&self) -> Option<&Arc<dyn LLMProvider>> {
        self.provider.as_ref()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub(crate) fn apply(&self, builder: LocalAgentBuilder) -> LocalAgentBuilder {
        match &self.provider {
            Some(provider) => builder
                .provider(Arc::clone(provider))
                .executor_config(self.config.clone()),
            None => builder,
        }
    }
}
