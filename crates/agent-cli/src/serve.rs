//! Hosting agents and storage tools

use agent_a2a::HostState;
use agent_mcp::ToolServer;
use agent_news::{
    ModelBinding, business_analyzer_agent, business_card, news_assistant, news_assistant_card,
    root_card, sentiment_analyzer_agent, sentiment_card, storage_assistant_card,
    storage_news_assistant,
};
use agent_storage::storage_registry;
use agent_utils::AppConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::agents::{object_store, root_coordinator, storage_tools};
use crate::{HostedAgent, RouterKind};

fn listen_addr(config: &AppConfig) -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], config.port))
}

/// Build `which` and pair it with its capability card
async fn host_state(
    config: &AppConfig,
    which: HostedAgent,
    router: RouterKind,
    buckets: &[String],
) -> anyhow::Result<HostState> {
    let model = ModelBinding::from_app_config(config)?;
    let url = config.public_url();

    Ok(match which {
        HostedAgent::Root => HostState::new(
            Arc::new(root_coordinator(config, &model, router)?),
            root_card(url),
        ),
        HostedAgent::News => HostState::new(Arc::new(news_assistant(&model)?), news_assistant_card(url)),
        HostedAgent::Storage => {
            let tools = storage_tools(config, buckets).await?;
            HostState::new(
                Arc::new(storage_news_assistant(&model, tools)?),
                storage_assistant_card(url),
            )
        }
        HostedAgent::Sentiment => {
            HostState::new(Arc::new(sentiment_analyzer_agent(&model)?), sentiment_card(url))
        }
        HostedAgent::Business => {
            HostState::new(Arc::new(business_analyzer_agent(&model)?), business_card(url))
        }
    })
}

/// Host one agent under its capability card
pub async fn agent(
    config: &AppConfig,
    which: HostedAgent,
    router: RouterKind,
    buckets: &[String],
) -> anyhow::Result<()> {
    let state = host_state(config, which, router, buckets).await?;
    info!(agent = %state.card().name, url = %state.card().url, model = %config.model, "hosting agent");

    agent_a2a::serve(listen_addr(config), state).await?;
    Ok(())
}

/// Serve `create_object` and `list_objects`
pub async fn storage(config: &AppConfig, buckets: &[String]) -> anyhow::Result<()> {
    let store = object_store(config, buckets).await?;
    let server = ToolServer::new("storage", storage_registry(store)?);
    server.serve(listen_addr(config)).await?;
    Ok(())
}
