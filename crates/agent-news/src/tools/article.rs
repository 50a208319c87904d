//! Article download over HTTP

use agent_tools::{ParameterSpec, Result, Tool, ToolDescriptor, ValueType};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the raw body of an article URL
///
/// A failed download is reported in the returned text so the calling agent
/// can tell the user about it.
pub struct GetNewsArticleTool {
    descriptor: ToolDescriptor,
    http: reqwest::Client,
}

impl GetNewsArticleTool {
    /// Tool with a 30 second request timeout
    pub fn new() -> reqwest::Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            descriptor: ToolDescriptor::new(
                "get_news_article",
                "Fetches the content of a news article from its URL.",
            )
            .param(ParameterSpec::required(
                "article_url",
                ValueType::String,
                "URL of the article",
            ))
            .returns(ValueType::String),
            http,
        })
    }

    async fn fetch(&self, url: &str) -> reqwest::Result<String> {
        self.http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

/// The first http(s) link in `text`, or the whole trimmed text
///
/// A coordinator chain hands the tool its full request sentence.
fn locate_url(text: &str) -> &str {
    text.split_whitespace()
        .find(|token| token.starts_with("http://") || token.starts_with("https://"))
        .unwrap_or_else(|| text.trim())
}

#[async_trait]
impl Tool for GetNewsArticleTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<Value> {
        let url = locate_url(args.get("article_url").and_then(Value::as_str).unwrap_or_default());
        debug!(url, "fetching article");

        match self.fetch(url).await {
            Ok(body) => Ok(Value::String(body)),
            Err(e) => {
                warn!(url, error = %e, "article fetch failed");
                Ok(Value::String(format!("Error fetching article: {e}")))
            }
        }
    }
}
