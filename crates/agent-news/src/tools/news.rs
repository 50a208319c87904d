//! City news lookup

use agent_tools::{ParameterSpec, Result, Tool, ToolDescriptor, ValueType};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::debug;

const HEADLINE: &str = "Bengaluru police issue traffic advisory for August 10 amid PM Modi's visit";
const CONTENT: &str = "The Bengaluru Traffic Police have announced traffic restrictions on key routes \
on August 10 between 8:30 am and 2:30 pm amid Prime Minister Narendra Modi's scheduled visit to the city.";

/// Returns the current headline for a city
///
/// Only Bengaluru has a feed; any other city gets an `error_message`
/// payload rather than a tool error, so the model can relay it.
pub struct GetNewsTool {
    descriptor: ToolDescriptor,
}

impl Default for GetNewsTool {
    fn default() -> Self {
        Self::new()
    }
}

impl GetNewsTool {
    pub fn new() -> Self {
        Self {
            descriptor: ToolDescriptor::new("get_news", "Retrieves the latest news headline for a city.")
                .param(ParameterSpec::required(
                    "city",
                    ValueType::String,
                    "Name of the city to fetch news for",
                ))
                .returns(ValueType::Object),
        }
    }
}

fn lookup(city: &str) -> Value {
    match city.trim().to_lowercase().as_str() {
        "bengaluru" | "bangalore" => json!({ "headline": HEADLINE, "content": CONTENT }),
        _ => json!({ "error_message": format!("News for '{city}' is not available.") }),
    }
}

#[async_trait]
impl Tool for GetNewsTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<Value> {
        let city = args.get("city").and_then(Value::as_str).unwrap_or_default();
        debug!(city, "looking up city news");
        Ok(lookup(city))
    }
}
