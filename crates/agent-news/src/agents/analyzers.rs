//! Summarizer and the two analyzers hosted behind capability cards

use agent_core::AgentDescriptor;
use agent_runtime::LocalAgent;
use std::sync::Arc;

use super::ModelBinding;
use crate::Result;
use crate::cards::{business_descriptor, sentiment_descriptor};
use crate::tools::{AnalyzeImpactTool, SummarizeArticleTool};

pub const SUMMARIZER_AGENT: &str = "summarizer_agent";

const SUMMARIZER_INSTRUCTION: &str =
    "Summarize the article you are given with the summarize_article tool and return the summary.";

const SENTIMENT_INSTRUCTION: &str = "You analyze the sentiment of news articles. Read the article you are \
given and answer whether its overall sentiment is positive, negative or neutral, followed by one \
sentence explaining why.";

const BUSINESS_INSTRUCTION: &str = "You analyze the business impact of news articles. Identify the \
business areas the article affects and, for each, an impact level and a short summary. File them with \
the analyze_impact tool, then tell the user the report was created and list the areas.";

/// Agent summarizing article text with `summarize_article`
pub fn summarizer_agent(model: &ModelBinding) -> Result<LocalAgent> {
    let descriptor = AgentDescriptor::new(SUMMARIZER_AGENT, "Handles summarizing news articles.")
        .with_tags(["summarize", "summary"]);

    Ok(model
        .apply(LocalAgent::builder(descriptor))
        .instruction(SUMMARIZER_INSTRUCTION)
        .tool(Arc::new(SummarizeArticleTool::new()))
        .build()?)
}

/// Agent judging an article's sentiment; needs a model
pub fn sentiment_analyzer_agent(model: &ModelBinding) -> Result<LocalAgent> {
    Ok(model
        .apply(LocalAgent::builder(sentiment_descriptor()))
        .instruction(SENTIMENT_INSTRUCTION)
        .build()?)
}

/// Agent filing business impact reports with `analyze_impact`
pub fn business_analyzer_agent(model: &ModelBinding) -> Result<LocalAgent> {
    Ok(model
        .apply(LocalAgent::builder(business_descriptor()))
        .instruction(BUSINESS_INSTRUCTION)
        .tool(Arc::new(AnalyzeImpactTool::new()))
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{BUSINESS_AGENT, SENTIMENT_AGENT};
    use agent_core::{Agent, Error, Message, SessionState};
    use agent_llm::{ContentBlock, ScriptedProvider};
    use serde_json::json;

    #[tokio::test]
    async fn test_offline_summarizer() {
        let agent = summarizer_agent(&ModelBinding::offline()).unwrap();
        let reply = agent
            .respond(&SessionState::new("s"), Message::user("Heavy rain floods the city."))
            .await
            .unwrap();
        assert_eq!(
            reply.text(),
            "This is a summary of the article: Heavy rain floods the city...."
        );
    }

    #[tokio::test]
    async fn test_offline_sentiment_needs_a_model() {
        let agent = sentiment_analyzer_agent(&ModelBinding::offline()).unwrap();
        assert_eq!(agent.name(), SENTIMENT_AGENT);

        let err = agent
            .respond(&SessionState::new("s"), Message::user("Analyze the sentiment: ..."))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ProcessingFailed(_)));
    }

    #[tokio::test]
    async fn test_business_analyzer_files_report() {
        let provider = Arc::new(
            ScriptedProvider::new()
                .with_tool_call(
                    "c1",
                    "analyze_impact",
                    json!({"impacted_areas": [
                        {"area_name": "Logistics", "impact_level": "medium", "summary": "Road closures delay deliveries."}
                    ]}),
                )
                .with_text("Report created for Logistics."),
        );
        let agent =
            business_analyzer_agent(&ModelBinding::hosted(provider.clone(), "test-model")).unwrap();
        assert_eq!(agent.name(), BUSINESS_AGENT);

        let reply = agent
            .respond(
                &SessionState::new("s"),
                Message::user("Analyze the business impact of: roads closed"),
            )
            .await
            .unwrap();
        assert_eq!(reply.text(), "Report created for Logistics.");

        let second = &provider.requests()[1];
        let tool_result = second
            .messages
            .iter()
            .flat_map(|m| &m.blocks)
            .find_map(|block| match block {
                ContentBlock::ToolResult { content, is_error, .. } => Some((content, *is_error)),
                _ => None,
            })
            .unwrap();
        assert!(tool_result.0.contains("has been created"));
        assert!(!tool_result.1);
    }
}
