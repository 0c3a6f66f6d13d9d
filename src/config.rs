use crate::types::{RelayError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Runtime configuration, deserialized from a JSON file. Only `listing_url`
/// is mandatory; everything else falls back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Endpoint serving the front-page listing as a JSON article array.
    pub listing_url: String,
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    /// Webhook endpoint for outbound messages. When absent, messages go to
    /// the console.
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Upper bound on articles taken from one listing fetch.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Pause between consecutive sends to one user, for transport rate limits.
    #[serde(default = "default_send_pause_ms")]
    pub send_pause_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_seconds")]
    pub retry_delay_seconds: u64,
}

fn default_state_file() -> PathBuf {
    PathBuf::from("seen_news.json")
}

fn default_max_items() -> usize {
    7
}

fn default_send_pause_ms() -> u64 {
    2000
}

fn default_user_agent() -> String {
    format!("news-relay/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_seconds() -> u64 {
    5
}

impl RelayConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: RelayConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.listing_url)?;
        if let Some(webhook) = &self.webhook_url {
            Url::parse(webhook)?;
        }
        if self.max_items == 0 {
            return Err(RelayError::Config(
                "max_items must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn send_pause(&self) -> Duration {
        Duration::from_millis(self.send_pause_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config: RelayConfig =
            serde_json::from_str(r#"{"listing_url": "https://news.example.com/listing.json"}"#)
                .unwrap();

        assert_eq!(config.state_file, PathBuf::from("seen_news.json"));
        assert_eq!(config.webhook_url, None);
        assert_eq!(config.max_items, 7);
        assert_eq!(config.send_pause_ms, 2000);
        assert_eq!(config.max_retries, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: RelayConfig = serde_json::from_str(
            r#"{
                "listing_url": "https://news.example.com/listing.json",
                "state_file": "/var/lib/relay/seen.json",
                "webhook_url": "https://hooks.example.com/abc",
                "max_items": 3,
                "send_pause_ms": 10
            }"#,
        )
        .unwrap();

        assert_eq!(config.state_file, PathBuf::from("/var/lib/relay/seen.json"));
        assert_eq!(config.max_items, 3);
        assert_eq!(config.send_pause(), Duration::from_millis(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_listing_url_is_rejected() {
        let config: RelayConfig =
            serde_json::from_str(r#"{"listing_url": "not a url"}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_max_items_is_rejected() {
        let config: RelayConfig = serde_json::from_str(
            r#"{"listing_url": "https://news.example.com/l.json", "max_items": 0}"#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(RelayError::Config(_))));
    }
}
