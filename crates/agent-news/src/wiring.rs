//! Assembling the news coordinator from configuration
//!
//! Each analyzer runs in-process unless its URL is configured, in which
//! case a [`RemoteAgentProxy`] stands in for it under the same descriptor.

use agent_a2a::{ProxyConfig, RemoteAgentProxy};
use agent_core::{Agent, AgentDescriptor};
use agent_mcp::{HttpMCPClient, MCPClient, MCPTool};
use agent_runtime::{KeywordRouter, Router};
use agent_storage::tools::{CREATE_OBJECT, LIST_OBJECTS};
use agent_tools::Tool;
use agent_utils::AppConfig;
use agent_workflow::Coordinator;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::agents::analyzers::SUMMARIZER_AGENT;
use crate::agents::{
    ModelBinding, business_analyzer_agent, sentiment_analyzer_agent, summarizer_agent,
};
use crate::cards::{BUSINESS_AGENT, SENTIMENT_AGENT, business_descriptor, sentiment_descriptor};
use crate::tools::GetNewsArticleTool;
use crate::{NewsError, Result};

pub const ROOT_AGENT: &str = "root_agent";
pub(crate) const ROOT_DESCRIPTION: &str =
    "Answers news questions by delegating to the summarizer, sentiment and business impact agents.";
const ARTICLE_TOOL: &str = "get_news_article";

/// The sub-agents a news coordinator delegates to
pub struct NewsTeam {
    pub summarizer: Arc<dyn Agent>,
    pub sentiment: Arc<dyn Agent>,
    pub business: Arc<dyn Agent>,
}

impl NewsTeam {
    /// Local summarizer; analyzers remote when their URL is configured
    pub fn from_config(config: &AppConfig, model: &ModelBinding) -> Result<Self> {
        let proxy_config = ProxyConfig::from_app_config(config);

        let sentiment: Arc<dyn Agent> = match &config.sentiment_agent_url {
            Some(url) => remote(sentiment_descriptor(), url, proxy_config.clone())?,
            None => Arc::new(sentiment_analyzer_agent(model)?),
        };
        let business: Arc<dyn Agent> = match &config.business_agent_url {
            Some(url) => remote(business_descriptor(), url, proxy_config)?,
            None => Arc::new(business_analyzer_agent(model)?),
        };

        Ok(Self {
            summarizer: Arc::new(summarizer_agent(model)?),
            sentiment,
            business,
        })
    }
}

fn remote(descriptor: AgentDescriptor, url: &str, config: ProxyConfig) -> Result<Arc<dyn Agent>> {
    info!(agent = %descriptor.name, url, "using remote analyzer");
    Ok(Arc::new(RemoteAgentProxy::new(descriptor, url, config)?))
}

/// Keyword hints for the news coordinator's candidates
///
/// Card tags are whole phrases ("sentiment analysis"); these cover the
/// shorter ways users ask for the same thing.
pub fn news_keywords() -> KeywordRouter {
    KeywordRouter::new()
        .with_keywords(SUMMARIZER_AGENT, ["summar"])
        .with_keywords(SENTIMENT_AGENT, ["sentiment"])
        .with_keywords(BUSINESS_AGENT, ["business", "impact"])
        .with_keywords(ARTICLE_TOOL, ["fetch", "download"])
}

/// Root coordinator over the news team and the article fetch tool
pub fn news_coordinator(team: NewsTeam, router: Arc<dyn Router>) -> Result<Coordinator> {
    let article = GetNewsArticleTool::new()?;

    Ok(Coordinator::builder(AgentDescriptor::new(ROOT_AGENT, ROOT_DESCRIPTION))
    .sub_agent(team.summarizer)
    .sub_agent(team.sentiment)
    .sub_agent(team.business)
    .tool(Arc::new(article))
    .router(router)
    .build()?)
}

/// Storage tools served by a tool server at `url`
pub async fn storage_tools_from_server(url: &str, timeout: Duration) -> Result<Vec<Arc<dyn Tool>>> {
    let client = Arc::new(HttpMCPClient::new(url.to_string(), HashMap::new(), timeout)?);
    client.connect().await?;

    let wanted = [CREATE_OBJECT, LIST_OBJECTS];
    let tools = MCPTool::discover_all(client, Some(wanted.as_slice())).await?;
    if let Some(missing) = wanted
        .iter()
        .find(|name| !tools.iter().any(|t| t.name() == **name))
    {
        return Err(NewsError::MissingTool((*missing).to_string()));
    }
    Ok(tools)
}
