//! Article summarization

use agent_tools::{ParameterSpec, Result, Tool, ToolDescriptor, ValueType};
use async_trait::async_trait;
use serde_json::{Map, Value};

const PREVIEW_CHARS: usize = 100;

/// Produces a short summary of an article's text
pub struct SummarizeArticleTool {
    descriptor: ToolDescriptor,
}

impl Default for SummarizeArticleTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SummarizeArticleTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor::new("summarize_article", "Summarizes a news article.")
                .param(ParameterSpec::required(
                    "article",
                    ValueType::String,
                    "Full text of the article",
                ))
                .returns(ValueType::String),
        }
    }
}

/// Summary built from the first characters of the article
pub fn summarize(article: &str) -> String {
    let preview: String = article.chars().take(PREVIEW_CHARS).collect();
    format!("This is a summary of the article: {preview}...")
}

#[async_trait]
impl Tool for SummarizeArticleTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<Value> {
        let article = args.get("article").and_then(Value::as_str).unwrap_or_default();
        Ok(Value::String(summarize(article)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_long_article_is_cut_at_char_boundary() {
        let article = "é".repeat(150);
        let summary = summarize(&article);
        assert_eq!(
            summary,
            format!("This is a summary of the article: {}...", "é".repeat(100))
        );
    }

    #[tokio::test]
    async fn test_short_article_kept_whole() {
        let out = SummarizeArticleTool::new()
            .invoke(json!({ "article": "Rain in Mumbai." }))
            .await
            .unwrap();
        assert_eq!(out, json!("This is a summary of the article: Rain in Mumbai...."));
    }
}
