//! Building blocks shared by the chat loop and the hosts

use agent_news::{ModelBinding, NewsTeam, news_coordinator, news_keywords, storage_tools_from_server};
use agent_runtime::{LlmRouter, Router};
use agent_storage::{FsObjectStore, InMemoryObjectStore, ObjectStore, storage_registry};
use agent_tools::Tool;
use agent_utils::AppConfig;
use agent_workflow::Coordinator;
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use crate::RouterKind;

/// Root coordinator routed by `kind`
pub fn root_coordinator(
    config: &AppConfig,
    model: &ModelBinding,
    kind: RouterKind,
) -> anyhow::Result<Coordinator> {
    let router: Arc<dyn Router> = match kind {
        RouterKind::Keyword => Arc::new(news_keywords()),
        RouterKind::Llm => {
            let provider = model
                .provider()
                .cloned()
                .context("the llm router needs a model provider")?;
            Arc::new(LlmRouter::new(provider, model.model()))
        }
    };
    Ok(news_coordinator(NewsTeam::from_config(config, model)?, router)?)
}

/// Storage tools from `STORAGE_SERVER_URL`, or over a local object store
pub async fn storage_tools(
    config: &AppConfig,
    buckets: &[String],
) -> anyhow::Result<Vec<Arc<dyn Tool>>> {
    match &config.storage_server_url {
        Some(url) => Ok(storage_tools_from_server(url, config.remote_timeout).await?),
        None => {
            let store = object_store(config, buckets).await?;
            Ok(storage_registry(store)?.list_tools().to_vec())
        }
    }
}

/// Object store under `STORAGE_ROOT`, or in memory when unset
pub async fn object_store(
    config: &AppConfig,
    buckets: &[String],
) -> anyhow::Result<Arc<dyn ObjectStore>> {
    match &config.storage_root {
        Some(root) => {
            let store = FsObjectStore::new(root);
            for bucket in buckets {
                store.create_bucket(bucket).await?;
            }
            info!(root = %store.root().display(), "using filesystem object store");
            Ok(Arc::new(store))
        }
        None => {
            let store = buckets
                .iter()
                .fold(InMemoryObjectStore::new(), |store, bucket| store.with_bucket(bucket));
            info!("using in-memory object store");
            Ok(Arc::new(store))
        }
    }
}
