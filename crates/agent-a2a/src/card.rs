//! Capability cards published at `/.well-known/agent.json`

use agent_core::{AgentDescriptor, ContentType};
use serde::{Deserialize, Serialize};

/// Optional protocol features a host supports
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCapabilities {
    /// Server-sent status updates; hosts in this workspace only poll
    #[serde(default)]
    pub streaming: bool,
}

/// One advertised skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Example requests, as a user would phrase them
    #[serde(default)]
    pub examples: Vec<String>,
}

impl AgentSkill {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            tags: Vec::new(),
            examples: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }
}

/// Wire form of an agent's capability descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    /// Endpoint accepting JSON-RPC task requests
    pub url: String,
    pub version: String,
    pub default_input_modes: Vec<ContentType>,
    pub default_output_modes: Vec<ContentType>,
    #[serde(default)]
    pub capabilities: AgentCapabilities,
    #[serde(default)]
    pub skills: Vec<AgentSkill>,
}

impl AgentCard {
    /// Card for a text-in/text-out agent served at `url`
    pub fn new(name: impl Into<String>, description: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            url: url.into(),
            version: "1.0.0".to_string(),
            default_input_modes: vec![ContentType::text()],
            default_output_modes: vec![ContentType::text()],
            capabilities: AgentCapabilities::default(),
            skills: Vec::new(),
        }
    }

    /// Card advertising a local agent's descriptor
    pub fn from_descriptor(descriptor: &AgentDescriptor, url: impl Into<String>) -> Self {
        Self {
            default_input_modes: descriptor.input_modes.iter().cloned().collect(),
            default_output_modes: descriptor.output_modes.iter().cloned().collect(),
            ..Self::new(&descriptor.name, &descriptor.description, url)
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_skill(mut self, skill: AgentSkill) -> Self {
        self.skills.push(skill);
        self
    }

    /// Descriptor used for routing; tags are the union of skill tags
    pub fn to_descriptor(&self) -> AgentDescriptor {
        AgentDescriptor::new(&self.name, &self.description)
            .with_tags(self.skills.iter().flat_map(|s| s.tags.iter().cloned()))
            .with_input_modes(self.default_input_modes.iter().cloned())
            .with_output_modes(self.default_output_modes.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sentiment_card() -> AgentCard {
        AgentCard::new(
            "sentiment_analyzer_agent",
            "Helps with analyzing sentiment from a news article",
            "http://localhost:8080/",
        )
        .with_skill(
            AgentSkill::new(
                "analyze_sentiment",
                "Sentiment Analysis Tool",
                "Helps with analyzing sentiment from a news article",
            )
            .with_tag("sentiment analysis")
            .with_example("Analyze the sentiment of this article: <article text>"),
        )
    }

    #[test]
    fn test_card_wire_names() {
        let value = serde_json::to_value(sentiment_card()).unwrap();
        assert_eq!(value["defaultInputModes"], json!(["text"]));
        assert_eq!(value["defaultOutputModes"], json!(["text"]));
        assert_eq!(value["capabilities"], json!({"streaming": false}));
        assert_eq!(value["skills"][0]["tags"], json!(["sentiment analysis"]));
        assert_eq!(value["version"], "1.0.0");
    }

    #[test]
    fn test_card_without_optional_sections_parses() {
        let card: AgentCard = serde_json::from_value(json!({
            "name": "business_analyzer_agent",
            "description": "Business impact",
            "url": "http://localhost:10001/",
            "version": "1.0.0",
            "defaultInputModes": ["text", "text/plain"],
            "defaultOutputModes": ["text"]
        }))
        .unwrap();
        assert!(card.skills.is_empty());
        assert!(!card.capabilities.streaming);
        assert_eq!(card.to_descriptor().input_modes.len(), 2);
    }

    #[test]
    fn test_descriptor_tags_are_union_of_skills() {
        let card = sentiment_card().with_skill(
            AgentSkill::new("tone", "Tone", "Tone of voice")
                .with_tag("tone")
                .with_tag("sentiment analysis"),
        );
        let descriptor = card.to_descriptor();
        assert_eq!(descriptor.name, "sentiment_analyzer_agent");
        assert_eq!(
            descriptor.capability_tags.iter().collect::<Vec<_>>(),
            vec!["sentiment analysis", "tone"]
        );
    }
}
