//! News assistant agents for the delegation workspace
//!
//! This crate configures the news demos on top of the generic crates:
//!
//! - [`tools`]: `get_news`, `get_news_article`, `summarize_article` and
//!   `analyze_impact`
//! - [`agents`]: the city news assistants, the summarizer and the two
//!   analyzers, each driven by a [`ModelBinding`]
//! - [`cards`]: capability cards the agents are hosted under
//! - [`wiring`]: the root coordinator, with analyzers local or remote
//!
//! # Example
//!
//! ```no_run
//! use agent_news::{ModelBinding, NewsTeam, news_coordinator, news_keywords};
//! use agent_utils::AppConfig;
//! use std::sync::Arc;
//!
//! # fn demo() -> agent_news::Result<()> {
//! let config = AppConfig::from_env().unwrap_or_default();
//! let model = ModelBinding::from_app_config(&config)?;
//! let _root = news_coordinator(
//!     NewsTeam::from_config(&config, &model)?,
//!     Arc::new(news_keywords()),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod agents;
pub mod cards;
pub mod error;
pub mod tools;
pub mod wiring;

pub use agents::{
    ModelBinding, business_analyzer_agent, news_assistant, sentiment_analyzer_agent,
    storage_news_assistant, summarizer_agent,
};
pub use cards::{
    business_card, news_assistant_card, root_card, sentiment_card, storage_assistant_card,
};
pub use error::{NewsError, Result};
pub use wiring::{NewsTeam, news_coordinator, news_keywords, storage_tools_from_server};
