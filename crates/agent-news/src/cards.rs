//! Capability cards of the hosted agents
//!
//! The analyzer cards back both sides: the host publishes them and the
//! coordinator derives the proxy descriptor from them, so routing tags
//! never drift between the two. The root coordinator and the city news
//! assistants get cards too so they can be served to other clients.

use agent_a2a::{AgentCard, AgentSkill};
use agent_core::{AgentDescriptor, ContentType};

use crate::agents::assistant::{
    NEWS_ASSISTANT, NEWS_DESCRIPTION, STORAGE_ASSISTANT, STORAGE_DESCRIPTION,
};
use crate::wiring::{ROOT_AGENT, ROOT_DESCRIPTION};

pub const SENTIMENT_AGENT: &str = "sentiment_analyzer_agent";
pub const BUSINESS_AGENT: &str = "business_analyzer_agent";

const SENTIMENT_DESCRIPTION: &str = "Helps with analyzing sentiment from a news article";
const BUSINESS_DESCRIPTION: &str = "Helps with analyzing business impact from a news article";

/// Card of the sentiment analyzer served at `url`
pub fn sentiment_card(url: impl Into<String>) -> AgentCard {
    AgentCard::new(SENTIMENT_AGENT, SENTIMENT_DESCRIPTION, url).with_skill(
        AgentSkill::new("analyze_sentiment", "Sentiment Analysis Tool", SENTIMENT_DESCRIPTION)
            .with_tag("sentiment analysis")
            .with_example("Analyze the sentiment of this article: <article text>"),
    )
}

/// Card of the business impact analyzer served at `url`
pub fn business_card(url: impl Into<String>) -> AgentCard {
    let modes = vec![ContentType::text(), ContentType::new(ContentType::TEXT_PLAIN)];
    AgentCard {
        default_input_modes: modes.clone(),
        default_output_modes: modes,
        ..AgentCard::new(BUSINESS_AGENT, BUSINESS_DESCRIPTION, url)
    }
    .with_skill(
        AgentSkill::new(
            "analyze_business_impact",
            "Business Impact Analysis Tool",
            BUSINESS_DESCRIPTION,
        )
        .with_tag("business impact analysis")
        .with_example("Analyze the business impact of this article: <article text>"),
    )
}

/// Card of the root coordinator served at `url`
pub fn root_card(url: impl Into<String>) -> AgentCard {
    AgentCard::new(ROOT_AGENT, ROOT_DESCRIPTION, url).with_skill(
        AgentSkill::new("analyze_news", "News Analysis", ROOT_DESCRIPTION)
            .with_tag("summarize")
            .with_tag("sentiment analysis")
            .with_tag("business impact analysis")
            .with_example("Summarize then analyze the sentiment of: <article text>")
            .with_example("Fetch https://example.com/story then summarize"),
    )
}

/// Card of the city news assistant served at `url`
pub fn news_assistant_card(url: impl Into<String>) -> AgentCard {
    AgentCard::new(NEWS_ASSISTANT, NEWS_DESCRIPTION, url).with_skill(
        AgentSkill::new("get_news", "City News", NEWS_DESCRIPTION)
            .with_tag("city news")
            .with_example("What is the news in Bengaluru?"),
    )
}

/// Card of the storage-backed news assistant served at `url`
pub fn storage_assistant_card(url: impl Into<String>) -> AgentCard {
    AgentCard::new(STORAGE_ASSISTANT, STORAGE_DESCRIPTION, url).with_skill(
        AgentSkill::new("save_news", "City News Storage", STORAGE_DESCRIPTION)
            .with_tag("city news")
            .with_tag("storage")
            .with_example("Save the news for Bengaluru in the bucket news"),
    )
}

/// Routing descriptor of the sentiment analyzer
pub fn sentiment_descriptor() -> AgentDescriptor {
    sentiment_card("").to_descriptor()
}

/// Routing descriptor of the business impact analyzer
pub fn business_descriptor() -> AgentDescriptor {
    business_card("").to_descriptor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_card_wire_shape() {
        let value = serde_json::to_value(sentiment_card("http://localhost:10002/")).unwrap();
        assert_eq!(value["name"], SENTIMENT_AGENT);
        assert_eq!(value["url"], "http://localhost:10002/");
        assert_eq!(value["capabilities"]["streaming"], false);
        assert_eq!(value["skills"][0]["id"], "analyze_sentiment");
        assert_eq!(value["defaultInputModes"], serde_json::json!(["text"]));
    }

    #[test]
    fn test_business_card_modes_and_tags() {
        let card = business_card("http://localhost:10003/");
        assert_eq!(card.default_output_modes.len(), 2);

        let descriptor = card.to_descriptor();
        assert!(descriptor.capability_tags.contains("business impact analysis"));
        assert!(descriptor.input_modes.contains(&ContentType::new(ContentType::TEXT_PLAIN)));
    }

    #[test]
    fn test_user_facing_cards_name_their_agents() {
        use crate::agents::{ModelBinding, news_assistant};
        use agent_core::Agent;

        let card = news_assistant_card("http://localhost:8080/");
        let agent = news_assistant(&ModelBinding::offline()).unwrap();
        assert_eq!(card.name, agent.descriptor().name);
        assert_eq!(card.description, agent.descriptor().description);

        assert_eq!(root_card("").name, ROOT_AGENT);
        assert_eq!(storage_assistant_card("").name, STORAGE_ASSISTANT);
        assert!(
            root_card("")
                .to_descriptor()
                .capability_tags
                .contains("business impact analysis")
        );
    }

    #[test]
    fn test_descriptors_match_cards() {
        assert_eq!(sentiment_descriptor().name, SENTIMENT_AGENT);
        assert_eq!(business_descriptor().name, BUSINESS_AGENT);
        assert!(sentiment_descriptor().capability_tags.contains("sentiment analysis"));
    }
}
