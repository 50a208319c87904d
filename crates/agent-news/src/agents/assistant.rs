//! City news assistants

use agent_core::AgentDescriptor;
use agent_runtime::LocalAgent;
use agent_storage::tools::{CREATE_OBJECT, LIST_OBJECTS};
use agent_tools::Tool;
use std::sync::Arc;

use super::ModelBinding;
use crate::tools::GetNewsTool;
use crate::{NewsError, Result};

const NEWS_INSTRUCTION: &str = "You are a helpful agent who answers questions about the news of any city. \
Look the city up with the get_news tool. If the tool returns an error_message, pass it on to the user.";

const STORAGE_INSTRUCTION: &str = "You are a helpful agent who answers questions about the news of any city \
and keeps copies of it in object storage. Look the city up with the get_news tool. When the user asks \
to save news, store it with create_object in the bucket they name. Use list_objects to show what has \
been saved. Report storage errors to the user as they are returned.";

pub const NEWS_ASSISTANT: &str = "news_assistant_agent";
pub const STORAGE_ASSISTANT: &str = "news_storage_assistant_agent";

pub(crate) const NEWS_DESCRIPTION: &str = "Agent to retrieve news for any particular city.";
pub(crate) const STORAGE_DESCRIPTION: &str =
    "Agent to retrieve news for any city and save it to object storage.";

/// Agent answering city news questions with `get_news`
pub fn news_assistant(model: &ModelBinding) -> Result<LocalAgent> {
    let descriptor = AgentDescriptor::new(NEWS_ASSISTANT, NEWS_DESCRIPTION).with_tag("city news");

    Ok(model
        .apply(LocalAgent::builder(descriptor))
        .instruction(NEWS_INSTRUCTION)
        .tool(Arc::new(GetNewsTool::new()))
        .build()?)
}

/// News assistant that can also save news into object storage
///
/// `storage_tools` must include `create_object` and `list_objects`, local
/// or wrapped from a tool server; other tools are ignored.
pub fn storage_news_assistant(
    model: &ModelBinding,
    storage_tools: Vec<Arc<dyn Tool>>,
) -> Result<LocalAgent> {
    let descriptor =
        AgentDescriptor::new(STORAGE_ASSISTANT, STORAGE_DESCRIPTION).with_tags(["city news", "storage"]);

    let mut builder = model
        .apply(LocalAgent::builder(descriptor))
        .instruction(STORAGE_INSTRUCTION)
        .tool(Arc::new(GetNewsTool::new()));

    for name in [CREATE_OBJECT, LIST_OBJECTS] {
        let tool = storage_tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| NewsError::MissingTool(name.to_string()))?;
        builder = builder.tool(Arc::clone(tool));
    }

    Ok(builder.build()?)
}
