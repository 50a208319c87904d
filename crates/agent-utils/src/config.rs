//! Environment-driven process configuration

use std::time::Duration;
use thiserror::Error;

use crate::LogFormat;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: String, value: String },
}

const DEFAULT_API_BASE: &str = "http://localhost:11434/v1";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 60;
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Process configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// OpenAI-compatible endpoint of the hosted model (`MODEL_API_BASE`)
    pub model_api_base: String,
    /// Bearer key for the model endpoint (`MODEL_API_KEY`)
    pub model_api_key: Option<String>,
    /// Model identifier (`MODEL`)
    pub model: String,
    /// Listen port for hosted servers (`PORT`)
    pub port: u16,
    /// Public base URL advertised in capability cards (`HOST_OVERRIDE`)
    pub host_override: Option<String>,
    /// Base URL of the remote sentiment analyzer (`SENTIMENT_AGENT_URL`)
    pub sentiment_agent_url: Option<String>,
    /// Base URL of the remote business analyzer (`BUSINESS_AGENT_URL`)
    pub business_agent_url: Option<String>,
    /// Base URL of the storage tool server (`STORAGE_SERVER_URL`)
    pub storage_server_url: Option<String>,
    /// Root directory of the filesystem object store (`STORAGE_ROOT`)
    pub storage_root: Option<String>,
    /// Upper bound on one remote task (`REMOTE_TIMEOUT_SECS`)
    pub remote_timeout: Duration,
    /// Delay between remote task polls (`REMOTE_POLL_INTERVAL_MS`)
    pub remote_poll_interval: Duration,
    /// Tracing output format (`LOG_FORMAT`)
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_api_base: DEFAULT_API_BASE.to_string(),
            model_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            port: DEFAULT_PORT,
            host_override: None,
            sentiment_agent_url: None,
            business_agent_url: None,
            storage_server_url: None,
            storage_root: None,
            remote_timeout: Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
            remote_poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(v) => parse::<u16>("PORT", &v)?,
            None => defaults.port,
        };
        let remote_timeout = match get("REMOTE_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(parse("REMOTE_TIMEOUT_SECS", &v)?),
            None => defaults.remote_timeout,
        };
        let remote_poll_interval = match get("REMOTE_POLL_INTERVAL_MS") {
            Some(v) => Duration::from_millis(parse("REMOTE_POLL_INTERVAL_MS", &v)?),
            None => defaults.remote_poll_interval,
        };
        let log_format = match get("LOG_FORMAT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                key: "LOG_FORMAT".to_string(),
                value: v.clone(),
            })?,
            None => defaults.log_format,
        };

        Ok(Self {
            model_api_base: get("MODEL_API_BASE").unwrap_or(defaults.model_api_base),
            model_api_key: get("MODEL_API_KEY"),
            model: get("MODEL").unwrap_or(defaults.model),
            port,
            host_override: get("HOST_OVERRIDE"),
            sentiment_agent_url: get("SENTIMENT_AGENT_URL"),
            business_agent_url: get("BUSINESS_AGENT_URL"),
            storage_server_url: get("STORAGE_SERVER_URL"),
            storage_root: get("STORAGE_ROOT"),
            remote_timeout,
            remote_poll_interval,
            log_format,
        })
    }

    /// Base URL a hosted server advertises in its capability card
    pub fn public_url(&self) -> String {
        self.host_override
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}/", self.port))
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.port, 8080);
        assert_eq!(config.remote_timeout, Duration::from_secs(60));
        assert_eq!(config.public_url(), "http://localhost:8080/");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "10001"),
            ("MODEL", "llama3.2"),
            ("HOST_OVERRIDE", "https://sentiment.example.com/"),
            ("SENTIMENT_AGENT_URL", "http://localhost:8080"),
            ("REMOTE_POLL_INTERVAL_MS", "50"),
            ("LOG_FORMAT", "json"),
            ("MODEL_API_KEY", ""),
        ]))
        .unwrap();

        assert_eq!(config.port, 10001);
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.public_url(), "https://sentiment.example.com/");
        assert_eq!(
            config.sentiment_agent_url.as_deref(),
            Some("http://localhost:8080")
        );
        assert_eq!(config.remote_poll_interval, Duration::from_millis(50));
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.model_api_key.is_none());
    }

    #[test]
    fn test_invalid_number() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "PORT".to_string(),
                value: "eighty".to_string()
            }
        );
    }
}
